//! Highlight, gamma and brightness shaping.
//!
//! Applied per sample, in this order:
//!
//! 1. [`recover_highlights`] - soft shoulder above the knee
//! 2. [`reduce_highlights`] - quadratic shoulder that dims the top end
//! 3. [`apply_gamma`] - sRGB encoding, only for linear data
//! 4. [`brightness`] - plain gain
//!
//! Every curve is monotonic and has an exact identity setting. The final
//! clip to `[0, DISPLAY_WHITE]` is a separate step ([`clip_to_display`])
//! that the pipeline runs once, last.

use nb_color::transfer;
use nb_core::error::ensure_positive;
use nb_core::{Image, Mode, Result, DISPLAY_WHITE};
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highlight recovery knee as a fraction of display white.
pub const KNEE: f64 = 0.5;

/// Highlight recovery.
///
/// Below the knee `K = 0.5·W` nothing changes. Above it the excess is
/// normalized to `u = (x − K) / (W − K)` and bent by a shoulder of strength
/// `c = 1 − 1/h`:
///
/// ```text
/// x' = K + (W − K) · u / (1 + u)^c
/// ```
///
/// The slope is 1 at the knee for every `h`, so the curve joins the
/// untouched range without a kink. `h > 1` compresses (`x' ≤ x`, slope
/// `≤ 1`), tending to the Reinhard shoulder `u / (1 + u)` as `h` grows;
/// `h < 1` expands. `h = 1` is the identity. Strictly increasing for every
/// `h > 0`.
#[inline]
pub fn recover_highlights(x: f64, h: f64) -> f64 {
    let knee = KNEE * DISPLAY_WHITE;
    if h == 1.0 || x <= knee {
        return x;
    }
    let span = DISPLAY_WHITE - knee;
    let u = (x - knee) / span;
    let c = 1.0 - 1.0 / h;
    knee + span * u * (1.0 + u).powf(-c)
}

/// Highlight reduction.
///
/// With `c = ½(1 − 1/d)`:
///
/// ```text
/// x ≤ 0      : x
/// 0 < x ≤ W  : x − c·x²/W
/// x > W      : W(1 − c) + (1 − 2c)(x − W)
/// ```
///
/// The segments meet with matching slopes, so the curve is monotonic for
/// every `d > 0`. `d > 1` dims highlights, `d < 1` lifts them, `d = 1` is
/// the identity.
#[inline]
pub fn reduce_highlights(x: f64, d: f64) -> f64 {
    if d == 1.0 || x <= 0.0 {
        return x;
    }
    let c = 0.5 * (1.0 - 1.0 / d);
    let w = DISPLAY_WHITE;
    if x <= w {
        x - c * x * x / w
    } else {
        w * (1.0 - c) + (1.0 - 2.0 * c) * (x - w)
    }
}

/// Display gamma: the sRGB OETF for linear data, nothing otherwise.
#[inline]
pub fn apply_gamma(x: f64, mode: Mode) -> f64 {
    match mode {
        Mode::Linear => transfer::oetf(x),
        Mode::NonLinear => x,
    }
}

/// Brightness gain.
///
/// `brightness(a, brightness(b, x)) ≈ brightness(a * b, x)`.
#[inline]
pub fn brightness(gain: f64, x: f64) -> f64 {
    gain * x
}

/// Parameters of the tone shaper.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ToneCurve {
    /// Highlight recovery exponent `h > 0`.
    pub hl_recover: f64,
    /// Highlight reduction factor `d > 0`.
    pub hl_reduction: f64,
    /// Brightness gain `> 0`.
    pub brightness: f64,
}

impl Default for ToneCurve {
    fn default() -> Self {
        Self {
            hl_recover: 1.0,
            hl_reduction: 1.0,
            brightness: 1.0,
        }
    }
}

impl ToneCurve {
    /// Rejects non-positive or non-finite settings.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("hl_recover", self.hl_recover)?;
        ensure_positive("hl_reduction", self.hl_reduction)?;
        ensure_positive("brightness", self.brightness)?;
        Ok(())
    }

    /// Returns `true` if the curve leaves `mode` data unchanged.
    pub fn is_identity(&self, mode: Mode) -> bool {
        self.hl_recover == 1.0
            && self.hl_reduction == 1.0
            && self.brightness == 1.0
            && mode == Mode::NonLinear
    }

    /// Runs the whole curve on one sample.
    #[inline]
    pub fn apply(&self, x: f64, mode: Mode) -> f64 {
        let x = recover_highlights(x, self.hl_recover);
        let x = reduce_highlights(x, self.hl_reduction);
        let x = apply_gamma(x, mode);
        brightness(self.brightness, x)
    }
}

/// Applies `curve` to every sample of `image`.
///
/// # Errors
///
/// Returns [`nb_core::Error::InvalidParameter`] if `curve` fails
/// [`ToneCurve::validate`].
pub fn shape_tones(image: &Image, curve: &ToneCurve, mode: Mode) -> Result<Image> {
    curve.validate()?;
    if curve.is_identity(mode) {
        trace!("tone curve is the identity");
        return Ok(image.clone());
    }
    debug!(
        hl_recover = curve.hl_recover,
        hl_reduction = curve.hl_reduction,
        brightness = curve.brightness,
        %mode,
        "shaping tones"
    );
    let curve = *curve;
    Ok(image.map_samples(move |x| curve.apply(x, mode)))
}

/// Clamps every sample to `[0, DISPLAY_WHITE]`.
///
/// Images already in range come back sharing their planes. NaN is not
/// touched; [`crate::Pipeline::run`] rejects non-finite input up front.
pub fn clip_to_display(image: &Image) -> Image {
    let in_range = image.floor().is_none_or(|lo| lo >= 0.0)
        && image.peak().is_none_or(|hi| hi <= DISPLAY_WHITE);
    if in_range {
        return image.clone();
    }
    debug!("clipping to display range");
    image.map_samples(|x| x.clamp(0.0, DISPLAY_WHITE))
}
