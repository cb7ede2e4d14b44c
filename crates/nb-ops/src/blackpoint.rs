//! Blackpoint clipper.
//!
//! Cuts the sky background and stretches what remains back over the
//! original range. All planes share one zero point so the colour balance
//! set by the booster survives.
//!
//! ```text
//! t  = pedestal(blackpoint, reference)
//! v' = max(v − t, 0) × peak / (peak − t)
//! ```
//!
//! The pedestal is `blackpoint × peak` for [`BlackpointReference::Peak`] and
//! `min + blackpoint × (median − min)` for [`BlackpointReference::Median`],
//! with min, median and peak taken over all three planes.
//!
//! `blackpoint = 1.0` is "off" for both references.

use std::fmt;
use std::str::FromStr;

use nb_color::lab::check_domain;
use nb_core::{Error, Image, Mode, Result};
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::stats::Summary;

/// Blackpoint value meaning "leave the image alone".
pub const BLACKPOINT_OFF: f64 = 1.0;

/// What the blackpoint fraction is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BlackpointReference {
    /// Fraction of the brightest sample.
    #[default]
    Peak,
    /// Fraction of the way from the darkest sample to the median.
    Median,
}

impl BlackpointReference {
    const fn name(self) -> &'static str {
        match self {
            Self::Peak => "peak",
            Self::Median => "median",
        }
    }

    /// Pedestal for `blackpoint` on `image`.
    pub fn pedestal(self, blackpoint: f64, image: &Image) -> f64 {
        match self {
            Self::Peak => blackpoint * image.peak().unwrap_or(0.0),
            Self::Median => {
                let all = Summary::of_image(image);
                all.min + blackpoint * (all.median - all.min)
            }
        }
    }
}

impl FromStr for BlackpointReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "peak" | "max" => Ok(Self::Peak),
            "median" => Ok(Self::Median),
            _ => Err(Error::invalid_parameter(
                "blackpoint_ref",
                f64::NAN,
                format!("unknown blackpoint reference '{s}' (expected peak or median)"),
            )),
        }
    }
}

impl fmt::Display for BlackpointReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validates a blackpoint fraction.
pub(crate) fn check_blackpoint(blackpoint: f64) -> Result<f64> {
    if !blackpoint.is_finite() || !(0.0..=1.0).contains(&blackpoint) {
        return Err(Error::invalid_parameter(
            "blackpoint",
            blackpoint,
            "must be within [0, 1]",
        ));
    }
    Ok(blackpoint)
}

/// Clips everything below `blackpoint × peak` to zero and rescales the rest
/// so the peak stays where it was.
///
/// Same as [`clip_blackpoint_with`] using [`BlackpointReference::Peak`].
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if `blackpoint` is outside `[0, 1]`
/// or not finite, and [`Error::DomainError`] if the image holds non-finite
/// samples.
///
/// # Example
///
/// ```rust
/// use nb_core::{Image, Plane};
/// use nb_ops::clip_blackpoint;
///
/// let image = Image::from_planes(
///     Plane::from_data(2, 1, vec![0.1, 1.0]).unwrap(),
///     Plane::from_data(2, 1, vec![0.2, 0.6]).unwrap(),
///     Plane::from_data(2, 1, vec![0.0, 0.4]).unwrap(),
/// )
/// .unwrap();
///
/// let out = clip_blackpoint(&image, 0.2).unwrap();
/// assert_eq!(out.plane(0).data()[0], 0.0);
/// assert!((out.plane(0).data()[1] - 1.0).abs() < 1e-12);
/// ```
pub fn clip_blackpoint(image: &Image, blackpoint: f64) -> Result<Image> {
    clip_blackpoint_with(image, blackpoint, BlackpointReference::Peak)
}

/// Clips everything below the pedestal of `reference` to zero and rescales
/// the rest so the peak stays where it was.
///
/// A pedestal at or below zero, or at or above the peak, leaves the image
/// alone.
///
/// # Errors
///
/// See [`clip_blackpoint`].
pub fn clip_blackpoint_with(
    image: &Image,
    blackpoint: f64,
    reference: BlackpointReference,
) -> Result<Image> {
    let blackpoint = check_blackpoint(blackpoint)?;
    if blackpoint == BLACKPOINT_OFF {
        trace!(blackpoint, "blackpoint is a no-op");
        return Ok(image.clone());
    }
    check_domain(image, Mode::NonLinear, "blackpoint")?;

    let peak = image.peak().unwrap_or(0.0);
    let threshold = reference.pedestal(blackpoint, image);
    if threshold <= 0.0 || threshold >= peak {
        trace!(blackpoint, %reference, threshold, peak, "no pedestal to remove");
        return Ok(image.clone());
    }

    let scale = peak / (peak - threshold);
    debug!(blackpoint, %reference, peak, threshold, scale, "clipping blackpoint");

    Ok(image.map_samples(|v| (v - threshold).max(0.0) * scale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nb_core::Plane;

    fn image() -> Image {
        Image::from_planes(
            Plane::from_data(3, 1, vec![0.1, 0.5, 0.8]).unwrap(),
            Plane::from_data(3, 1, vec![0.05, 0.3, 0.4]).unwrap(),
            Plane::from_data(3, 1, vec![0.0, 0.2, 0.6]).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_one_is_noop() {
        let src = image();
        let out = clip_blackpoint(&src, 1.0).unwrap();
        assert_eq!(out, src);
        assert!(out.plane(0).shares_data(src.plane(0)));
    }

    #[test]
    fn test_zero_is_noop() {
        let src = image();
        assert_eq!(clip_blackpoint(&src, 0.0).unwrap(), src);
    }

    #[test]
    fn test_clip_and_rescale() {
        let out = clip_blackpoint(&image(), 0.25).unwrap();
        // peak 0.8, threshold 0.2, scale 0.8 / 0.6
        let r = out.plane(0).data();
        assert_eq!(r[0], 0.0);
        assert_relative_eq!(r[1], 0.4, max_relative = 1e-12);
        assert_relative_eq!(r[2], 0.8, max_relative = 1e-12);
        assert_eq!(out.plane(2).data()[1], 0.0);
        assert_relative_eq!(out.plane(1).data()[2], 0.8 / 3.0, max_relative = 1e-12);
    }

    #[test]
    fn test_monotonic() {
        let out = clip_blackpoint(&image(), 0.4).unwrap();
        let r = out.plane(0).data();
        assert!(r[0] <= r[1] && r[1] <= r[2]);
    }

    #[test]
    fn test_dark_image_untouched() {
        let dark = Image::from_planes(Plane::zeros(2, 2), Plane::zeros(2, 2), Plane::zeros(2, 2))
            .unwrap();
        assert_eq!(clip_blackpoint(&dark, 0.5).unwrap(), dark);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let src = image();
        for bad in [-0.1, 1.5, f64::NAN] {
            assert!(clip_blackpoint(&src, bad).unwrap_err().is_invalid_parameter());
        }
    }

    #[test]
    fn test_median_reference() {
        // all samples: 0.0 0.05 0.1 0.2 0.3 0.4 0.5 0.6 0.8, min 0, median 0.3
        let src = image();
        let out = clip_blackpoint_with(&src, 0.5, BlackpointReference::Median).unwrap();
        // pedestal 0.15, scale 0.8 / 0.65
        let scale = 0.8 / 0.65;
        assert_eq!(out.plane(0).data()[0], 0.0);
        assert_relative_eq!(out.plane(0).data()[1], 0.35 * scale, max_relative = 1e-12);
        assert_relative_eq!(out.plane(0).data()[2], 0.8, max_relative = 1e-12);

        // min is 0, so a zero fraction leaves nothing to remove
        assert_eq!(
            clip_blackpoint_with(&src, 0.0, BlackpointReference::Median).unwrap(),
            src
        );
        assert_eq!(
            clip_blackpoint_with(&src, 1.0, BlackpointReference::Median).unwrap(),
            src
        );
    }

    #[test]
    fn test_median_reference_removes_floor() {
        let lifted = Image::from_planes(
            Plane::from_data(3, 1, vec![0.2, 0.3, 0.9]).unwrap(),
            Plane::from_data(3, 1, vec![0.2, 0.25, 0.5]).unwrap(),
            Plane::from_data(3, 1, vec![0.2, 0.3, 0.4]).unwrap(),
        )
        .unwrap();
        let out = clip_blackpoint_with(&lifted, 0.0, BlackpointReference::Median).unwrap();
        assert_eq!(out.floor(), Some(0.0));
        assert_relative_eq!(out.peak().unwrap(), 0.9, max_relative = 1e-12);
    }

    #[test]
    fn test_reference_names() {
        for reference in [BlackpointReference::Peak, BlackpointReference::Median] {
            assert_eq!(reference.to_string().parse::<BlackpointReference>().unwrap(), reference);
        }
        assert!("mean".parse::<BlackpointReference>().unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_rejects_non_finite_samples() {
        let bad = Image::from_planes(
            Plane::from_data(2, 1, vec![0.5, f64::NAN]).unwrap(),
            Plane::filled(2, 1, 0.3),
            Plane::filled(2, 1, 0.1),
        )
        .unwrap();
        assert!(clip_blackpoint(&bad, 0.2).unwrap_err().is_domain_error());
    }
}
