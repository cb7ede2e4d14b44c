//! Channel booster.
//!
//! Rebalances the weak lines against Hα by scaling the SII and OIII planes.
//! Values are not clipped here; the pipeline clips once at the end.

use nb_core::error::ensure_non_negative;
use nb_core::{EmissionLine, Image, Palette, Result};
use tracing::debug;

/// Scales the plane carrying `line` by `factor`.
///
/// A factor of exactly `1.0` hands the plane through untouched.
fn boost_line(image: &Image, palette: Palette, line: EmissionLine, factor: f64) -> Image {
    if factor == 1.0 {
        return image.clone();
    }
    let index = palette.plane_of(line);
    debug!(%line, plane = index, factor, "boosting");
    image.with_plane(index, image.plane(index).map(|v| v * factor))
}

/// Multiplies the SII plane by `sii_boost` and the OIII plane by `oiii_boost`.
///
/// The Hα plane is never touched.
///
/// # Errors
///
/// Returns [`nb_core::Error::InvalidParameter`] if either factor is negative
/// or not finite.
///
/// # Example
///
/// ```rust
/// use nb_core::{Image, Palette, Plane};
/// use nb_ops::boost;
///
/// let image = Image::from_planes(
///     Plane::filled(1, 1, 0.5),
///     Plane::filled(1, 1, 0.2),
///     Plane::filled(1, 1, 0.1),
/// )
/// .unwrap();
///
/// let out = boost(&image, Palette::Hso, 2.0, 1.0).unwrap();
/// assert_eq!(out.plane(1).data(), &[0.4]);
/// ```
pub fn boost(image: &Image, palette: Palette, sii_boost: f64, oiii_boost: f64) -> Result<Image> {
    let sii_boost = ensure_non_negative("sii_boost", sii_boost)?;
    let oiii_boost = ensure_non_negative("oiii_boost", oiii_boost)?;

    let out = boost_line(image, palette, EmissionLine::Sii, sii_boost);
    Ok(boost_line(&out, palette, EmissionLine::Oiii, oiii_boost))
}
