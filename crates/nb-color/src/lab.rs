//! RGB ⇄ XYZ ⇄ CIE L\*a\*b\* conversion.
//!
//! RGB samples use sRGB primaries with a D65 white. In [`Mode::NonLinear`]
//! they are sRGB-encoded and get decoded before the matrix (and re-encoded
//! after the inverse), in [`Mode::Linear`] they go to the matrix directly.
//!
//! ```text
//! RGB ──(EOTF if non-linear)──► linear RGB ──M──► XYZ ──f──► L*a*b*
//! L*a*b* ──f⁻¹──► XYZ ──M⁻¹──► linear RGB ──(OETF if non-linear)──► RGB
//! ```
//!
//! The inverse matrix is computed from the forward one in `f64`, so a round
//! trip reproduces its input to well under `1e-9` for in-gamut data.

use std::sync::LazyLock;

use glam::{DMat3, DVec3};
use nb_core::{Error, Image, Mode, Plane, Result};
use tracing::trace;

use crate::transfer;

/// CIE ε = (6/29)³.
pub const EPSILON: f64 = 216.0 / 24389.0;

/// CIE κ = (29/3)³.
pub const KAPPA: f64 = 24389.0 / 27.0;

/// δ = 6/29, the `f` value where the cube-root branch meets the linear one.
const DELTA: f64 = 6.0 / 29.0;

/// D65 reference white in XYZ, normalized to `Y = 1`.
pub const D65_WHITE: DVec3 = DVec3::new(0.95047, 1.0, 1.08883);

/// Linear sRGB → XYZ (D65).
///
/// Rows as usually printed:
///
/// ```text
/// | 0.4124564 0.3575761 0.1804375 |
/// | 0.2126729 0.7151522 0.0721750 |
/// | 0.0193339 0.1191920 0.9503041 |
/// ```
pub const RGB_TO_XYZ: DMat3 = DMat3::from_cols(
    DVec3::new(0.4124564, 0.2126729, 0.0193339),
    DVec3::new(0.3575761, 0.7151522, 0.1191920),
    DVec3::new(0.1804375, 0.0721750, 0.9503041),
);

/// XYZ (D65) → linear sRGB.
pub static XYZ_TO_RGB: LazyLock<DMat3> = LazyLock::new(|| RGB_TO_XYZ.inverse());

/// Lab companding function.
#[inline]
pub fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

/// Inverse of [`lab_f`].
#[inline]
pub fn lab_f_inv(f: f64) -> f64 {
    if f > DELTA {
        f * f * f
    } else {
        (116.0 * f - 16.0) / KAPPA
    }
}

/// L\* of a relative luminance `y` (white = 1).
#[inline]
pub fn lightness_of(y: f64) -> f64 {
    116.0 * lab_f(y) - 16.0
}

/// Linear RGB → XYZ.
#[inline]
pub fn rgb_to_xyz(rgb: [f64; 3]) -> [f64; 3] {
    (RGB_TO_XYZ * DVec3::from_array(rgb)).to_array()
}

/// XYZ → linear RGB.
#[inline]
pub fn xyz_to_rgb(xyz: [f64; 3]) -> [f64; 3] {
    (*XYZ_TO_RGB * DVec3::from_array(xyz)).to_array()
}

/// XYZ → L\*a\*b\* relative to [`D65_WHITE`].
#[inline]
pub fn xyz_to_lab(xyz: [f64; 3]) -> [f64; 3] {
    let [fx, fy, fz] = (DVec3::from_array(xyz) / D65_WHITE).to_array().map(lab_f);
    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

/// L\*a\*b\* → XYZ relative to [`D65_WHITE`].
#[inline]
pub fn lab_to_xyz([l, a, b]: [f64; 3]) -> [f64; 3] {
    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;
    let t = DVec3::new(lab_f_inv(fx), lab_f_inv(fy), lab_f_inv(fz));
    (t * D65_WHITE).to_array()
}

/// Encoded RGB pixel → L\*a\*b\*.
#[inline]
pub fn rgb_to_lab(rgb: [f64; 3], mode: Mode) -> [f64; 3] {
    let linear = if mode.is_display_encoded() {
        transfer::eotf_rgb(rgb)
    } else {
        rgb
    };
    xyz_to_lab(rgb_to_xyz(linear))
}

/// L\*a\*b\* → encoded RGB pixel.
#[inline]
pub fn lab_to_rgb(lab: [f64; 3], mode: Mode) -> [f64; 3] {
    let linear = xyz_to_rgb(lab_to_xyz(lab));
    if mode.is_display_encoded() {
        transfer::oetf_rgb(linear)
    } else {
        linear
    }
}

/// An image in L\*a\*b\*: lightness plus the two opponent axes.
///
/// Only exists inside the colour stage. Stored as an [`Image`] whose planes
/// are L\*, a\*, b\* in that order, which keeps the shape invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct LabImage {
    planes: Image,
}

impl LabImage {
    /// Builds a Lab image from its planes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the planes differ in dimensions.
    pub fn from_planes(l: Plane, a: Plane, b: Plane) -> Result<Self> {
        Ok(Self {
            planes: Image::from_planes(l, a, b)?,
        })
    }

    /// L\* plane, 0 (black) to 100 (white).
    pub fn l(&self) -> &Plane {
        self.planes.plane(0)
    }

    /// a\* plane (green ⇄ red).
    pub fn a(&self) -> &Plane {
        self.planes.plane(1)
    }

    /// b\* plane (blue ⇄ yellow).
    pub fn b(&self) -> &Plane {
        self.planes.plane(2)
    }

    /// `(width, height)` pair.
    pub fn dimensions(&self) -> (u32, u32) {
        self.planes.dimensions()
    }

    /// Returns a copy with the L\* plane replaced, keeping a\* and b\*.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if `l` differs in dimensions.
    pub fn with_lightness(&self, l: Plane) -> Result<Self> {
        Ok(Self {
            planes: self.planes.try_with_plane(0, l)?,
        })
    }
}

/// Rejects samples the colour conversion cannot represent.
///
/// Any non-finite sample fails; in [`Mode::Linear`] negative intensities
/// fail too.
///
/// # Errors
///
/// Returns [`Error::DomainError`] naming `stage` and the first offending sample.
pub fn check_domain(image: &Image, mode: Mode, stage: &'static str) -> Result<()> {
    for plane in image.planes() {
        if let Some((index, value)) = plane.find(|v| !v.is_finite()) {
            return Err(Error::domain(stage, value, index, "is not finite"));
        }
        if mode == Mode::Linear {
            if let Some((index, value)) = plane.find(|v| v < 0.0) {
                return Err(Error::domain(
                    stage,
                    value,
                    index,
                    "is a negative linear intensity",
                ));
            }
        }
    }
    Ok(())
}

/// Converts an RGB image to L\*a\*b\*.
///
/// # Errors
///
/// Returns [`Error::DomainError`] if [`check_domain`] rejects the input.
pub fn to_lab(image: &Image, mode: Mode) -> Result<LabImage> {
    check_domain(image, mode, "rgb_to_lab")?;
    trace!(?mode, dims = ?image.dimensions(), "rgb -> lab");
    let lab = image.map_pixels(|rgb| rgb_to_lab(rgb, mode));
    Ok(LabImage { planes: lab })
}

/// Converts an L\*a\*b\* image back to RGB.
///
/// # Errors
///
/// Returns [`Error::DomainError`] if any Lab sample is not finite.
pub fn from_lab(lab: &LabImage, mode: Mode) -> Result<Image> {
    // a* and b* are signed, so only finiteness applies here.
    check_domain(&lab.planes, Mode::NonLinear, "lab_to_rgb")?;
    trace!(?mode, dims = ?lab.dimensions(), "lab -> rgb");
    Ok(lab.planes.map_pixels(|px| lab_to_rgb(px, mode)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn image(r: &[f64], g: &[f64], b: &[f64]) -> Image {
        let w = r.len() as u32;
        Image::from_planes(
            Plane::from_data(w, 1, r.to_vec()).unwrap(),
            Plane::from_data(w, 1, g.to_vec()).unwrap(),
            Plane::from_data(w, 1, b.to_vec()).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_white_maps_to_l100() {
        let lab = rgb_to_lab([1.0, 1.0, 1.0], Mode::Linear);
        assert_relative_eq!(lab[0], 100.0, epsilon = 1e-3);
        assert!(lab[1].abs() < 0.01);
        assert!(lab[2].abs() < 0.01);
    }

    #[test]
    fn test_black_maps_to_l0() {
        let lab = rgb_to_lab([0.0, 0.0, 0.0], Mode::NonLinear);
        assert_relative_eq!(lab[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_matrix_inverse() {
        let id = RGB_TO_XYZ * *XYZ_TO_RGB;
        assert!(id.abs_diff_eq(DMat3::IDENTITY, 1e-12));
    }

    #[test]
    fn test_companding_inverse() {
        for i in 0..=200 {
            let t = i as f64 / 100.0;
            assert_relative_eq!(lab_f_inv(lab_f(t)), t, epsilon = 1e-12, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_image_roundtrip() {
        let src = image(
            &[0.0, 0.2, 0.5, 1.0, 0.001],
            &[0.0, 0.3, 0.25, 1.0, 0.9],
            &[0.0, 0.1, 0.75, 1.0, 0.02],
        );
        for mode in [Mode::Linear, Mode::NonLinear] {
            let back = from_lab(&to_lab(&src, mode).unwrap(), mode).unwrap();
            for (p, q) in src.planes().iter().zip(back.planes()) {
                for (&x, &y) in p.data().iter().zip(q.data()) {
                    assert_relative_eq!(x, y, epsilon = 1e-9, max_relative = 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_domain_errors() {
        let nan = image(&[0.1, f64::NAN], &[0.1, 0.1], &[0.1, 0.1]);
        let err = to_lab(&nan, Mode::NonLinear).unwrap_err();
        assert!(err.is_domain_error());

        let neg = image(&[0.1, 0.1], &[0.1, -0.2], &[0.1, 0.1]);
        assert!(to_lab(&neg, Mode::Linear).unwrap_err().is_domain_error());
        assert!(to_lab(&neg, Mode::NonLinear).is_ok());
    }

    #[test]
    fn test_with_lightness_keeps_ab() {
        let lab = to_lab(&image(&[0.4], &[0.2], &[0.1]), Mode::NonLinear).unwrap();
        let bright = lab.with_lightness(Plane::filled(1, 1, 80.0)).unwrap();
        assert!(bright.a().shares_data(lab.a()));
        assert!(bright.b().shares_data(lab.b()));
        assert!(lab.with_lightness(Plane::zeros(2, 1)).is_err());
    }
}
