//! Subtractive chromatic noise reduction (SCNR).
//!
//! Narrowband composites tend to pick up a green cast. SCNR caps the green
//! plane (index 1, whatever line the palette maps there) at a neutral level
//! derived from red and blue:
//!
//! ```text
//! g' = min(g, f(r, b))
//! ```
//!
//! Red and blue pass through untouched, so the filter is idempotent.

use std::fmt;
use std::str::FromStr;

use nb_core::{Error, Image, Result};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Plane that SCNR acts on.
pub const GREEN: usize = 1;

/// Neutral level green is capped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScnrMethod {
    /// `f = (r + b) / 2`. Removes more green.
    AverageNeutral,
    /// `f = max(r, b)`. Keeps green wherever red or blue supports it.
    #[default]
    MaximumNeutral,
}

impl ScnrMethod {
    /// Neutral level for one pixel.
    #[inline]
    pub fn neutral(self, r: f64, b: f64) -> f64 {
        match self {
            Self::AverageNeutral => 0.5 * (r + b),
            Self::MaximumNeutral => r.max(b),
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::AverageNeutral => "average",
            Self::MaximumNeutral => "maximum",
        }
    }
}

impl FromStr for ScnrMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "average" | "average_neutral" | "avg" => Ok(Self::AverageNeutral),
            "maximum" | "maximum_neutral" | "max" => Ok(Self::MaximumNeutral),
            _ => Err(Error::invalid_parameter(
                "scnr_method",
                f64::NAN,
                format!("unknown SCNR method '{s}' (expected average or maximum)"),
            )),
        }
    }
}

impl fmt::Display for ScnrMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Caps the green plane at the neutral level of `method`.
///
/// Returns the image unchanged when `enabled` is `false`.
///
/// # Example
///
/// ```rust
/// use nb_core::{Image, Plane};
/// use nb_ops::{scnr, ScnrMethod};
///
/// let image = Image::from_planes(
///     Plane::filled(1, 1, 0.2),
///     Plane::filled(1, 1, 0.9),
///     Plane::filled(1, 1, 0.4),
/// )
/// .unwrap();
///
/// let out = scnr(&image, ScnrMethod::MaximumNeutral, true).unwrap();
/// assert_eq!(out.plane(1).data(), &[0.4]);
/// ```
pub fn scnr(image: &Image, method: ScnrMethod, enabled: bool) -> Result<Image> {
    if !enabled {
        return Ok(image.clone());
    }
    debug!(%method, "scnr");

    let [r, g, b] = image.planes();
    let neutral = r.zip_map(b, |r, b| method.neutral(r, b))?;
    let green = g.zip_map(&neutral, f64::min)?;
    Ok(image.with_plane(GREEN, green))
}
