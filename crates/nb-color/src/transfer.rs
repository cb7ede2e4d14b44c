//! sRGB transfer function.
//!
//! The sRGB standard uses a piecewise function combining a linear segment
//! near black with a power curve (approximately gamma 2.2) for the rest.
//! Both directions stay piecewise-linear below zero, so they are total over
//! the reals and invert each other exactly.
//!
//! # Reference
//!
//! IEC 61966-2-1:1999

/// Encoded value where the linear toe ends.
pub const ENCODED_CUTOFF: f64 = 0.04045;

/// Slope of the linear toe.
pub const TOE_SLOPE: f64 = 12.92;

/// Linear value where the toe ends.
///
/// Derived from [`ENCODED_CUTOFF`] instead of the rounded `0.0031308` so
/// that [`eotf`] and [`oetf`] switch branches at the same point.
pub const LINEAR_CUTOFF: f64 = ENCODED_CUTOFF / TOE_SLOPE;

const A: f64 = 0.055;
const GAMMA: f64 = 2.4;

/// sRGB EOTF: decodes sRGB encoded values to linear light.
///
/// # Formula
///
/// ```text
/// if V <= 0.04045:
///     L = V / 12.92
/// else:
///     L = ((V + 0.055) / 1.055)^2.4
/// ```
///
/// # Example
///
/// ```rust
/// use nb_color::transfer::eotf;
///
/// let linear = eotf(0.5);
/// assert!((linear - 0.214).abs() < 0.01);
/// ```
#[inline]
pub fn eotf(v: f64) -> f64 {
    if v <= ENCODED_CUTOFF {
        v / TOE_SLOPE
    } else {
        ((v + A) / (1.0 + A)).powf(GAMMA)
    }
}

/// sRGB OETF: encodes linear light to sRGB.
///
/// # Formula
///
/// ```text
/// if L <= 0.0031308:
///     V = L * 12.92
/// else:
///     V = 1.055 * L^(1/2.4) - 0.055
/// ```
#[inline]
pub fn oetf(l: f64) -> f64 {
    if l <= LINEAR_CUTOFF {
        l * TOE_SLOPE
    } else {
        (1.0 + A) * l.powf(1.0 / GAMMA) - A
    }
}

/// Applies the sRGB EOTF to an RGB triplet.
#[inline]
pub fn eotf_rgb(rgb: [f64; 3]) -> [f64; 3] {
    rgb.map(eotf)
}

/// Applies the sRGB OETF to an RGB triplet.
#[inline]
pub fn oetf_rgb(rgb: [f64; 3]) -> [f64; 3] {
    rgb.map(oetf)
}
