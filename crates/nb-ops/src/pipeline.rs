//! The normalization pipeline.
//!
//! ```text
//! Booster → Blackpoint → SCNR → Colour → Tone → Clip
//! ```
//!
//! The input is checked once before the first stage: non-finite samples, and
//! negative ones in linear mode, fail with a domain error.
//!
//! Every stage is a pure function from `&Image` to a new `Image`. A stage
//! whose settings are neutral hands its input through with the planes
//! shared, so a run with default parameters returns the input unchanged.

use std::fmt;

use nb_color::{convert_with_lightness, lab};
use nb_core::{Image, Result};
use tracing::{debug, info};

use crate::blackpoint::clip_blackpoint_with;
use crate::booster::boost;
use crate::params::Parameters;
use crate::scnr::scnr;
use crate::tone::{clip_to_display, shape_tones};

/// One step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// SII / OIII gain.
    Booster,
    /// Background clip and rescale.
    Blackpoint,
    /// Green cap.
    Scnr,
    /// RGB → L\*a\*b\* → RGB with lightness selection.
    Color,
    /// Highlight, gamma and brightness curves.
    Tone,
    /// Clamp to the display range.
    Clip,
}

impl Stage {
    /// Stage name for logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Booster => "booster",
            Self::Blackpoint => "blackpoint",
            Self::Scnr => "scnr",
            Self::Color => "color",
            Self::Tone => "tone",
            Self::Clip => "clip",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated, reusable pipeline.
///
/// # Example
///
/// ```rust
/// use nb_core::{Image, Plane};
/// use nb_ops::{Parameters, Pipeline};
///
/// let image = Image::from_planes(
///     Plane::filled(2, 2, 0.2),
///     Plane::filled(2, 2, 0.3),
///     Plane::filled(2, 2, 0.1),
/// )
/// .unwrap();
///
/// let pipeline = Pipeline::new(Parameters::default()).unwrap();
/// let out = pipeline.run(image.clone()).unwrap();
/// assert_eq!(out, image);
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    params: Parameters,
}

impl Pipeline {
    /// Validates `params` and builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`nb_core::Error::InvalidParameter`] if any setting is out of range.
    pub fn new(params: Parameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Parameters of this pipeline.
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Stages in execution order.
    pub fn stages(&self) -> [Stage; 6] {
        [
            Stage::Booster,
            Stage::Blackpoint,
            Stage::Scnr,
            Stage::Color,
            Stage::Tone,
            Stage::Clip,
        ]
    }

    /// Runs a single stage.
    ///
    /// # Errors
    ///
    /// Whatever the stage reports: [`nb_core::Error::DomainError`] from the
    /// colour stage, shape errors from malformed images.
    pub fn apply_stage(&self, stage: Stage, image: &Image) -> Result<Image> {
        let p = &self.params;
        debug!(%stage, "running stage");
        match stage {
            Stage::Booster => boost(image, p.palette, p.sii_boost, p.oiii_boost),
            Stage::Blackpoint => clip_blackpoint_with(image, p.blackpoint, p.blackpoint_ref),
            Stage::Scnr => scnr(image, p.scnr_method, p.scnr),
            Stage::Color => convert_with_lightness(image, p.mode, p.palette, p.lightness),
            Stage::Tone => shape_tones(image, &p.tone(), p.mode),
            Stage::Clip => Ok(clip_to_display(image)),
        }
    }

    /// Runs every stage on `image`.
    ///
    /// Stops at the first failing stage; no partial result is returned.
    ///
    /// # Errors
    ///
    /// [`nb_core::Error::DomainError`] if `image` holds non-finite samples,
    /// or negative ones in linear mode, before any stage runs.
    pub fn run(&self, image: Image) -> Result<Image> {
        lab::check_domain(&image, self.params.mode, "input")?;
        let stages = self.stages();
        let (width, height) = image.dimensions();
        info!(width, height, stages = stages.len(), "normalizing");
        stages
            .into_iter()
            .try_fold(image, |image, stage| self.apply_stage(stage, &image))
    }
}
