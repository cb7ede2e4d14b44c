//! Lightness selection in L\*a\*b\*.
//!
//! The composite's L\* can be kept, or replaced by the lightness of one
//! emission line while a\* and b\* stay as they are. That re-lights the
//! image from a single (usually the cleanest) channel without shifting hue
//! or saturation.

use std::fmt;
use std::str::FromStr;

use nb_core::{EmissionLine, Error, Image, Mode, Palette, Result};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::lab::{self, LabImage};
use crate::transfer;

/// Source of L\* after the colour stage.
///
/// | code | mode       | L\* comes from                     |
/// |------|------------|------------------------------------|
/// | 0    | `Off`      | colour stage skipped entirely      |
/// | 1    | `Original` | the composite itself               |
/// | 2    | `Ha`       | the Hα plane                       |
/// | 3    | `Sii`      | the SII plane                      |
/// | 4    | `Oiii`     | the OIII plane                     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LightnessMode {
    /// No colour conversion.
    #[default]
    Off,
    /// Full round trip keeping the computed L\*.
    Original,
    /// L\* from the Hα plane.
    Ha,
    /// L\* from the SII plane.
    Sii,
    /// L\* from the OIII plane.
    Oiii,
}

impl LightnessMode {
    /// All modes in code order.
    pub const ALL: [LightnessMode; 5] = [
        Self::Off,
        Self::Original,
        Self::Ha,
        Self::Sii,
        Self::Oiii,
    ];

    /// Emission line that supplies L\*, if any.
    pub const fn line(self) -> Option<EmissionLine> {
        match self {
            Self::Off | Self::Original => None,
            Self::Ha => Some(EmissionLine::Ha),
            Self::Sii => Some(EmissionLine::Sii),
            Self::Oiii => Some(EmissionLine::Oiii),
        }
    }

    /// Returns `true` unless the colour stage is skipped.
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Off)
    }

    /// Numeric code used by the command line.
    pub const fn code(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Original => 1,
            Self::Ha => 2,
            Self::Sii => 3,
            Self::Oiii => 4,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Original => "original",
            Self::Ha => "ha",
            Self::Sii => "sii",
            Self::Oiii => "oiii",
        }
    }
}

impl TryFrom<u8> for LightnessMode {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        Self::ALL.get(code as usize).copied().ok_or_else(|| {
            Error::invalid_parameter("lightness", code as f64, "expected a code in 0..=4")
        })
    }
}

impl FromStr for LightnessMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        if let Ok(code) = wanted.parse::<u8>() {
            return Self::try_from(code);
        }
        Self::ALL
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| {
                Error::invalid_parameter(
                    "lightness",
                    f64::NAN,
                    format!("unknown lightness mode '{s}'"),
                )
            })
    }
}

impl fmt::Display for LightnessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Applies `lightness` to a Lab image computed from `source`.
///
/// For a line mode, the plane carrying that line (per `palette`) is read as
/// relative luminance, decoded from sRGB first in [`Mode::NonLinear`], and
/// its L\* replaces the composite's. A pixel whose three planes are equal
/// therefore keeps its L\* (up to rounding).
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if `source` and `lab` differ in shape.
pub fn select_lightness(
    lab: &LabImage,
    source: &Image,
    palette: Palette,
    lightness: LightnessMode,
    mode: Mode,
) -> Result<LabImage> {
    let Some(line) = lightness.line() else {
        return Ok(lab.clone());
    };

    let index = palette.plane_of(line);
    debug!(%line, plane = index, %palette, "replacing L* from emission line");

    let decode = mode.is_display_encoded();
    let l = source.plane(index).map(|v| {
        let y = if decode { transfer::eotf(v) } else { v };
        lab::lightness_of(y)
    });
    lab.with_lightness(l)
}

/// Runs the whole colour stage: RGB → L\*a\*b\*, lightness selection, back.
///
/// The input is checked for every mode; [`LightnessMode::Off`] then returns
/// `image` untouched (sharing its planes).
///
/// # Errors
///
/// Returns [`Error::DomainError`] if the image holds non-finite samples, or
/// negative ones in [`Mode::Linear`].
pub fn convert_with_lightness(
    image: &Image,
    mode: Mode,
    palette: Palette,
    lightness: LightnessMode,
) -> Result<Image> {
    lab::check_domain(image, mode, "rgb_to_lab")?;
    if !lightness.is_active() {
        return Ok(image.clone());
    }
    debug!(%mode, %lightness, "colour stage");
    let lab = lab::to_lab(image, mode)?;
    let lab = select_lightness(&lab, image, palette, lightness, mode)?;
    lab::from_lab(&lab, mode)
}
