//! Narrowband lines and their assignment to image planes.
//!
//! A [`Palette`] says which of the three emission lines is false-colored into
//! which of the R, G, B planes. Only the six permutations exist, so lookups
//! are total and need no error path.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A narrowband emission line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EmissionLine {
    /// Hydrogen-alpha, the reference channel.
    Ha,
    /// Ionized sulfur.
    Sii,
    /// Doubly ionized oxygen.
    Oiii,
}

impl EmissionLine {
    /// All lines.
    pub const ALL: [EmissionLine; 3] = [Self::Ha, Self::Sii, Self::Oiii];

    /// Short label for logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ha => "Ha",
            Self::Sii => "SII",
            Self::Oiii => "OIII",
        }
    }
}

impl fmt::Display for EmissionLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Assignment of the three emission lines to the R, G, B planes.
///
/// Variant names list the lines in R, G, B order.
///
/// ```rust
/// use nb_core::{EmissionLine, Palette};
///
/// let sho = Palette::Sho;
/// assert_eq!(sho.plane_of(EmissionLine::Sii), 0);
/// assert_eq!(sho.plane_of(EmissionLine::Ha), 1);
/// assert_eq!(sho.line_at(2), EmissionLine::Oiii);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Palette {
    /// R = Hα, G = SII, B = OIII.
    #[default]
    Hso,
    /// R = Hα, G = OIII, B = SII.
    Hos,
    /// R = SII, G = Hα, B = OIII (the "Hubble" palette).
    Sho,
    /// R = SII, G = OIII, B = Hα.
    Soh,
    /// R = OIII, G = Hα, B = SII.
    Ohs,
    /// R = OIII, G = SII, B = Hα.
    Osh,
}

impl Palette {
    /// All palettes.
    pub const ALL: [Palette; 6] = [
        Self::Hso,
        Self::Hos,
        Self::Sho,
        Self::Soh,
        Self::Ohs,
        Self::Osh,
    ];

    /// Plane indices as `(ha, sii, oiii)`.
    const fn indices(self) -> (usize, usize, usize) {
        match self {
            Self::Hso => (0, 1, 2),
            Self::Hos => (0, 2, 1),
            Self::Sho => (1, 0, 2),
            Self::Soh => (2, 0, 1),
            Self::Ohs => (1, 2, 0),
            Self::Osh => (2, 1, 0),
        }
    }

    /// Index of the plane carrying `line`.
    pub const fn plane_of(self, line: EmissionLine) -> usize {
        let (ha, sii, oiii) = self.indices();
        match line {
            EmissionLine::Ha => ha,
            EmissionLine::Sii => sii,
            EmissionLine::Oiii => oiii,
        }
    }

    /// Line carried by plane `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 3`.
    pub const fn line_at(self, index: usize) -> EmissionLine {
        let (ha, sii, _) = self.indices();
        assert!(index < 3, "plane index out of range");
        if index == ha {
            EmissionLine::Ha
        } else if index == sii {
            EmissionLine::Sii
        } else {
            EmissionLine::Oiii
        }
    }

    /// Lowercase name as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hso => "hso",
            Self::Hos => "hos",
            Self::Sho => "sho",
            Self::Soh => "soh",
            Self::Ohs => "ohs",
            Self::Osh => "osh",
        }
    }
}

impl FromStr for Palette {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| {
                Error::invalid_parameter(
                    "palette",
                    f64::NAN,
                    format!("unknown palette '{s}' (expected one of hso, hos, sho, soh, ohs, osh)"),
                )
            })
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
