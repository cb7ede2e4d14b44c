//! Three-plane images.
//!
//! An [`Image`] is an ordered (R, G, B) triple of [`Plane`]s that all share
//! the same dimensions. The invariant is checked once, by
//! [`Image::from_planes`], and every method that produces a new image keeps
//! it: shape is never mutated, only values.
//!
//! # Usage
//!
//! ```rust
//! use nb_core::{Image, Plane};
//!
//! let image = Image::from_planes(
//!     Plane::filled(2, 2, 0.2),
//!     Plane::filled(2, 2, 0.3),
//!     Plane::filled(2, 2, 0.1),
//! )
//! .unwrap();
//!
//! // Swap red and blue per pixel
//! let swapped = image.map_pixels(|[r, g, b]| [b, g, r]);
//! assert_eq!(swapped.plane(0).data()[0], 0.1);
//! ```
//!
//! # Used By
//!
//! - `nb-color` - RGB ⇄ L\*a\*b\* conversion
//! - `nb-ops` - Every pipeline stage

use crate::{Error, Plane, Result};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Number of planes in an [`Image`].
pub const CHANNELS: usize = 3;

/// An ordered triple of equally shaped planes (R, G, B).
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    planes: [Plane; CHANNELS],
}

impl Image {
    /// Builds an image from its red, green and blue planes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the planes differ in dimensions.
    pub fn from_planes(r: Plane, g: Plane, b: Plane) -> Result<Self> {
        r.ensure_same_shape(&g)?;
        r.ensure_same_shape(&b)?;
        Ok(Self { planes: [r, g, b] })
    }

    /// Builds an image from an array of planes.
    pub fn from_plane_array(planes: [Plane; CHANNELS]) -> Result<Self> {
        let [r, g, b] = planes;
        Self::from_planes(r, g, b)
    }

    /// Builds an image from interleaved `[R G B R G B ...]` samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len() != width * height * 3`.
    pub fn from_interleaved(width: u32, height: u32, data: &[f64]) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} interleaved samples, got {}", expected, data.len()),
            ));
        }

        let mut channels: [Vec<f64>; CHANNELS] = Default::default();
        for channel in channels.iter_mut() {
            channel.reserve_exact(expected / CHANNELS);
        }
        for px in data.chunks_exact(CHANNELS) {
            for (channel, &v) in channels.iter_mut().zip(px) {
                channel.push(v);
            }
        }

        let [r, g, b] = channels;
        Self::from_planes(
            Plane::from_data(width, height, r)?,
            Plane::from_data(width, height, g)?,
            Plane::from_data(width, height, b)?,
        )
    }

    /// Interleaves the planes as `[R G B R G B ...]`.
    pub fn to_interleaved(&self) -> Vec<f64> {
        let [r, g, b] = &self.planes;
        let mut out = Vec::with_capacity(self.pixel_count() * CHANNELS);
        for ((&r, &g), &b) in r.data().iter().zip(g.data()).zip(b.data()) {
            out.extend_from_slice(&[r, g, b]);
        }
        out
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.planes[0].width()
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.planes[0].height()
    }

    /// `(width, height)` pair.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.planes[0].dimensions()
    }

    /// Number of pixels per plane.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.planes[0].len()
    }

    /// Plane `index` (0 = R, 1 = G, 2 = B).
    ///
    /// # Panics
    ///
    /// Panics if `index >= 3`.
    #[inline]
    pub fn plane(&self, index: usize) -> &Plane {
        &self.planes[index]
    }

    /// All three planes in R, G, B order.
    #[inline]
    pub fn planes(&self) -> &[Plane; CHANNELS] {
        &self.planes
    }

    /// Consumes the image and returns its planes.
    #[inline]
    pub fn into_planes(self) -> [Plane; CHANNELS] {
        self.planes
    }

    /// Returns a copy of this image with plane `index` replaced.
    ///
    /// The replacement is produced from one of this image's planes by the
    /// caller, so only the shape is re-checked in debug builds.
    pub fn with_plane(&self, index: usize, plane: Plane) -> Image {
        debug_assert!(plane.same_shape(&self.planes[index]));
        let mut planes = self.planes.clone();
        planes[index] = plane;
        Image { planes }
    }

    /// Fallible variant of [`with_plane`](Self::with_plane) for planes of
    /// external origin.
    pub fn try_with_plane(&self, index: usize, plane: Plane) -> Result<Image> {
        self.planes[index].ensure_same_shape(&plane)?;
        Ok(self.with_plane(index, plane))
    }

    /// Applies `f` to every plane independently.
    pub fn map_planes<F>(&self, f: F) -> Image
    where
        F: Fn(&Plane) -> Plane,
    {
        let planes = [f(&self.planes[0]), f(&self.planes[1]), f(&self.planes[2])];
        debug_assert!(planes.iter().all(|p| p.same_shape(&self.planes[0])));
        Image { planes }
    }

    /// Applies `f` to every sample of every plane.
    pub fn map_samples<F>(&self, f: F) -> Image
    where
        F: Fn(f64) -> f64 + Send + Sync,
    {
        self.map_planes(|plane| plane.map(&f))
    }

    /// Applies `f` to every `[r, g, b]` pixel.
    pub fn map_pixels<F>(&self, f: F) -> Image
    where
        F: Fn([f64; CHANNELS]) -> [f64; CHANNELS] + Send + Sync,
    {
        let [r, g, b] = &self.planes;
        let (r, g, b) = (r.data(), g.data(), b.data());
        let n = self.pixel_count();

        #[cfg(feature = "parallel")]
        let pixels: Vec<[f64; CHANNELS]> = (0..n)
            .into_par_iter()
            .map(|i| f([r[i], g[i], b[i]]))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let pixels: Vec<[f64; CHANNELS]> = (0..n).map(|i| f([r[i], g[i], b[i]])).collect();

        self.from_pixels(&pixels)
    }

    /// Splits per-pixel results back into planes of this image's shape.
    fn from_pixels(&self, pixels: &[[f64; CHANNELS]]) -> Image {
        let (width, height) = self.dimensions();
        let mut channels: [Vec<f64>; CHANNELS] = Default::default();
        for channel in channels.iter_mut() {
            channel.reserve_exact(pixels.len());
        }
        for px in pixels {
            for (channel, &v) in channels.iter_mut().zip(px) {
                channel.push(v);
            }
        }
        Image {
            planes: channels.map(|data| Plane::from_parts(width, height, data)),
        }
    }

    /// Largest sample across all planes, ignoring NaN.
    pub fn peak(&self) -> Option<f64> {
        self.planes.iter().filter_map(Plane::max).reduce(f64::max)
    }

    /// Smallest sample across all planes, ignoring NaN.
    pub fn floor(&self) -> Option<f64> {
        self.planes.iter().filter_map(Plane::min).reduce(f64::min)
    }

    /// Fails with [`Error::ShapeMismatch`] unless `other` has the same dimensions.
    pub fn ensure_same_shape(&self, other: &Image) -> Result<()> {
        self.planes[0].ensure_same_shape(&other.planes[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Image {
        Image::from_planes(
            Plane::from_data(2, 1, vec![0.1, 0.2]).unwrap(),
            Plane::from_data(2, 1, vec![0.3, 0.4]).unwrap(),
            Plane::from_data(2, 1, vec![0.5, 0.6]).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_from_planes_rejects_mismatch() {
        let err = Image::from_planes(
            Plane::zeros(2, 2),
            Plane::zeros(2, 2),
            Plane::zeros(3, 2),
        )
        .unwrap_err();
        assert!(err.is_shape_error());
    }

    #[test]
    fn test_interleaved_roundtrip() {
        let image = sample();
        let flat = image.to_interleaved();
        assert_eq!(flat, vec![0.1, 0.3, 0.5, 0.2, 0.4, 0.6]);
        let back = Image::from_interleaved(2, 1, &flat).unwrap();
        assert_eq!(back, image);
    }

    #[test]
    fn test_from_interleaved_checks_length() {
        assert!(Image::from_interleaved(2, 2, &[0.0; 11]).is_err());
    }

    #[test]
    fn test_map_pixels_keeps_shape() {
        let image = sample();
        let out = image.map_pixels(|[r, g, b]| [r + g + b, 0.0, 1.0]);
        assert_eq!(out.dimensions(), (2, 1));
        assert!((out.plane(0).data()[0] - 0.9).abs() < 1e-12);
        assert!(out.plane(2).data().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_with_plane_shares_untouched() {
        let image = sample();
        let out = image.with_plane(2, Plane::zeros(2, 1));
        assert!(out.plane(0).shares_data(image.plane(0)));
        assert!(out.plane(1).shares_data(image.plane(1)));
        assert!(image.try_with_plane(0, Plane::zeros(1, 1)).is_err());
    }

    #[test]
    fn test_peak_and_floor() {
        let image = sample();
        assert_eq!(image.peak(), Some(0.6));
        assert_eq!(image.floor(), Some(0.1));
    }
}
