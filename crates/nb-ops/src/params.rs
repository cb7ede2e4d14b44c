//! Pipeline configuration.
//!
//! [`Parameters`] is built once per run (defaults, then a preset, then
//! explicit overrides), validated, and never changed afterwards. With the
//! `serde` feature it reads and writes as a flat map, so presets are plain
//! YAML files:
//!
//! ```yaml
//! mode: non_linear
//! palette: sho
//! lightness: ha
//! scnr: true
//! sii_boost: 1.4
//! ```
//!
//! Missing keys fall back to their defaults. Every default is a no-op.

use nb_color::LightnessMode;
use nb_core::error::ensure_non_negative;
use nb_core::{Mode, Palette, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::blackpoint::{check_blackpoint, BlackpointReference, BLACKPOINT_OFF};
use crate::scnr::ScnrMethod;
use crate::tone::ToneCurve;

/// Every setting of one normalization run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Parameters {
    /// Whether input samples are linear or display-encoded.
    pub mode: Mode,
    /// Which line sits on which plane.
    pub palette: Palette,
    /// Lightness source for the colour stage.
    pub lightness: LightnessMode,
    /// Enables SCNR on the green plane.
    pub scnr: bool,
    /// Neutral level used by SCNR.
    pub scnr_method: ScnrMethod,
    /// Blackpoint fraction in `[0, 1]`; `1.0` disables it.
    pub blackpoint: f64,
    /// What `blackpoint` is a fraction of.
    pub blackpoint_ref: BlackpointReference,
    /// Gain on the SII plane, `>= 0`.
    pub sii_boost: f64,
    /// Gain on the OIII plane, `>= 0`.
    pub oiii_boost: f64,
    /// Highlight recovery exponent, `> 0`.
    pub hl_recover: f64,
    /// Highlight reduction factor, `> 0`.
    pub hl_reduction: f64,
    /// Brightness gain, `> 0`.
    pub brightness: f64,
    /// Write each output plane to its own file.
    pub save_channels: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            palette: Palette::default(),
            lightness: LightnessMode::default(),
            scnr: false,
            scnr_method: ScnrMethod::default(),
            blackpoint: BLACKPOINT_OFF,
            blackpoint_ref: BlackpointReference::default(),
            sii_boost: 1.0,
            oiii_boost: 1.0,
            hl_recover: 1.0,
            hl_reduction: 1.0,
            brightness: 1.0,
            save_channels: false,
        }
    }
}

impl Parameters {
    /// Starts a builder from the defaults.
    pub fn builder() -> ParametersBuilder {
        ParametersBuilder::default()
    }

    /// Checks every numeric range.
    ///
    /// # Errors
    ///
    /// Returns [`nb_core::Error::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        check_blackpoint(self.blackpoint)?;
        ensure_non_negative("sii_boost", self.sii_boost)?;
        ensure_non_negative("oiii_boost", self.oiii_boost)?;
        self.tone().validate()
    }

    /// Tone shaper settings.
    pub fn tone(&self) -> ToneCurve {
        ToneCurve {
            hl_recover: self.hl_recover,
            hl_reduction: self.hl_reduction,
            brightness: self.brightness,
        }
    }
}

/// Builder for [`Parameters`].
///
/// ```rust
/// use nb_core::Palette;
/// use nb_ops::Parameters;
///
/// let params = Parameters::builder()
///     .palette(Palette::Sho)
///     .sii_boost(1.5)
///     .build()
///     .unwrap();
/// assert_eq!(params.sii_boost, 1.5);
///
/// assert!(Parameters::builder().blackpoint(2.0).build().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParametersBuilder {
    params: Parameters,
}

impl ParametersBuilder {
    /// Starts from existing parameters, e.g. a loaded preset.
    pub fn from_parameters(params: Parameters) -> Self {
        Self { params }
    }

    /// Sets the input encoding.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.params.mode = mode;
        self
    }

    /// Sets the palette.
    pub fn palette(mut self, palette: Palette) -> Self {
        self.params.palette = palette;
        self
    }

    /// Sets the lightness mode.
    pub fn lightness(mut self, lightness: LightnessMode) -> Self {
        self.params.lightness = lightness;
        self
    }

    /// Enables or disables SCNR.
    pub fn scnr(mut self, enabled: bool) -> Self {
        self.params.scnr = enabled;
        self
    }

    /// Sets the SCNR neutral level.
    pub fn scnr_method(mut self, method: ScnrMethod) -> Self {
        self.params.scnr_method = method;
        self
    }

    /// Sets the blackpoint fraction.
    pub fn blackpoint(mut self, blackpoint: f64) -> Self {
        self.params.blackpoint = blackpoint;
        self
    }

    /// Sets the blackpoint reference.
    pub fn blackpoint_ref(mut self, reference: BlackpointReference) -> Self {
        self.params.blackpoint_ref = reference;
        self
    }

    /// Sets the SII gain.
    pub fn sii_boost(mut self, factor: f64) -> Self {
        self.params.sii_boost = factor;
        self
    }

    /// Sets the OIII gain.
    pub fn oiii_boost(mut self, factor: f64) -> Self {
        self.params.oiii_boost = factor;
        self
    }

    /// Sets the highlight recovery exponent.
    pub fn hl_recover(mut self, h: f64) -> Self {
        self.params.hl_recover = h;
        self
    }

    /// Sets the highlight reduction factor.
    pub fn hl_reduction(mut self, d: f64) -> Self {
        self.params.hl_reduction = d;
        self
    }

    /// Sets the brightness gain.
    pub fn brightness(mut self, gain: f64) -> Self {
        self.params.brightness = gain;
        self
    }

    /// Requests one output file per plane.
    pub fn save_channels(mut self, enabled: bool) -> Self {
        self.params.save_channels = enabled;
        self
    }

    /// Validates and returns the parameters.
    ///
    /// # Errors
    ///
    /// See [`Parameters::validate`].
    pub fn build(self) -> Result<Parameters> {
        self.params.validate()?;
        Ok(self.params)
    }
}
