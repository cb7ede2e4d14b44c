//! TIFF ingestion and export.
//!
//! Reads 8/16-bit integer (scaled to `[0, 1]`) and 32/64-bit float RGB or
//! RGBA files; alpha is dropped. Writes 32-bit float RGB, or one 32-bit
//! float grayscale file per plane.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use nb_core::{Image, CHANNELS};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::ColorType;
use tracing::debug;

/// Suffixes of the per-plane files written by [`write_channels`].
pub const CHANNEL_SUFFIXES: [&str; CHANNELS] = ["_r", "_g", "_b"];

/// Reads a three-channel TIFF into an [`Image`].
pub fn read_tiff<P: AsRef<Path>>(path: P) -> Result<Image> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut decoder = Decoder::new(BufReader::new(file))
        .with_context(|| format!("{} is not a TIFF file", path.display()))?;

    let (width, height) = decoder.dimensions().context("reading TIFF dimensions")?;
    let color_type = decoder.colortype().context("reading TIFF color type")?;
    let result = decoder
        .read_image()
        .with_context(|| format!("decoding {}", path.display()))?;

    let channels = match color_type {
        ColorType::RGB(_) => 3,
        ColorType::RGBA(_) => 4,
        other => bail!(
            "{}: unsupported color type {other:?}, expected RGB or RGBA",
            path.display()
        ),
    };

    let samples: Vec<f64> = match result {
        DecodingResult::U8(buf) => buf.iter().map(|&v| v as f64 / 255.0).collect(),
        DecodingResult::U16(buf) => buf.iter().map(|&v| v as f64 / 65535.0).collect(),
        DecodingResult::F32(buf) => buf.iter().map(|&v| v as f64).collect(),
        DecodingResult::F64(buf) => buf,
        _ => bail!("{}: unsupported sample format", path.display()),
    };

    let rgb: Vec<f64> = if channels == CHANNELS {
        samples
    } else {
        samples
            .chunks_exact(channels)
            .flat_map(|px| px[..CHANNELS].iter().copied())
            .collect()
    };

    debug!(path = %path.display(), width, height, ?color_type, "read TIFF");
    Image::from_interleaved(width, height, &rgb)
        .with_context(|| format!("{}: sample count does not match dimensions", path.display()))
}

/// Writes `image` as a 32-bit float RGB TIFF.
pub fn write_tiff<P: AsRef<Path>>(path: P, image: &Image) -> Result<()> {
    let path = path.as_ref();
    let data: Vec<f32> = image.to_interleaved().into_iter().map(|v| v as f32).collect();
    let mut encoder = create_encoder(path)?;
    encoder
        .write_image::<colortype::RGB32Float>(image.width(), image.height(), &data)
        .with_context(|| format!("encoding {}", path.display()))?;
    debug!(path = %path.display(), "wrote RGB TIFF");
    Ok(())
}

/// Writes each plane of `image` to its own grayscale TIFF next to `path`,
/// suffixed `_r`, `_g` and `_b`. Returns the paths written.
pub fn write_channels<P: AsRef<Path>>(path: P, image: &Image) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    let mut written = Vec::with_capacity(CHANNELS);
    for (plane, suffix) in image.planes().iter().zip(CHANNEL_SUFFIXES) {
        let target = channel_path(path, suffix);
        let data: Vec<f32> = plane.data().iter().map(|&v| v as f32).collect();
        let mut encoder = create_encoder(&target)?;
        encoder
            .write_image::<colortype::Gray32Float>(plane.width(), plane.height(), &data)
            .with_context(|| format!("encoding {}", target.display()))?;
        debug!(path = %target.display(), "wrote channel TIFF");
        written.push(target);
    }
    Ok(written)
}

/// `out.tif` + `_r` → `out_r.tif`.
pub fn channel_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    path.with_file_name(name)
}

fn create_encoder(path: &Path) -> Result<TiffEncoder<BufWriter<File>>> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    TiffEncoder::new(BufWriter::new(file))
        .with_context(|| format!("cannot start TIFF stream for {}", path.display()))
}
