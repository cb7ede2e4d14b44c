//! Sample encoding of an image.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether samples are raw sensor-linear intensities or already stretched.
///
/// Fixed for one pipeline run. It decides whether the colour stage decodes
/// sRGB before converting to XYZ and whether the tone shaper applies a
/// display gamma.
///
/// The numeric form is the one accepted on the command line:
///
/// ```rust
/// use nb_core::Mode;
///
/// assert_eq!(Mode::try_from(0).unwrap(), Mode::Linear);
/// assert_eq!(Mode::try_from(1).unwrap(), Mode::NonLinear);
/// assert!(Mode::try_from(2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Mode {
    /// Raw linear sensor units.
    Linear,
    /// Already stretched (display-encoded) data.
    #[default]
    NonLinear,
}

impl Mode {
    /// Returns `true` if the data is already display-encoded.
    #[inline]
    pub const fn is_display_encoded(self) -> bool {
        matches!(self, Self::NonLinear)
    }

    /// Numeric code used by the command line.
    #[inline]
    pub const fn code(self) -> u8 {
        match self {
            Self::Linear => 0,
            Self::NonLinear => 1,
        }
    }
}

impl TryFrom<u8> for Mode {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Linear),
            1 => Ok(Self::NonLinear),
            other => Err(Error::invalid_parameter(
                "mode",
                other as f64,
                "expected 0 (linear) or 1 (non-linear)",
            )),
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "linear" => Ok(Self::Linear),
            "1" | "non-linear" | "nonlinear" | "non_linear" => Ok(Self::NonLinear),
            _ => Err(Error::invalid_parameter(
                "mode",
                f64::NAN,
                format!("unknown mode '{s}'"),
            )),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::NonLinear => write!(f, "non-linear"),
        }
    }
}
