//! YAML presets.
//!
//! A preset is a serialized [`Parameters`]. Missing keys keep their
//! defaults and unknown keys are rejected, so typos do not pass silently.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use nb_ops::Parameters;
use tracing::debug;

/// Loads and validates a preset file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Parameters> {
    let path = path.as_ref();
    let text =
        fs::read_to_string(path).with_context(|| format!("cannot read preset {}", path.display()))?;
    let params = parse(&text).with_context(|| format!("invalid preset {}", path.display()))?;
    debug!(path = %path.display(), "loaded preset");
    Ok(params)
}

/// Parses and validates preset text.
pub fn parse(text: &str) -> Result<Parameters> {
    let params: Parameters = serde_yaml::from_str(text)?;
    params.validate()?;
    Ok(params)
}

/// Renders parameters as preset text.
pub fn to_yaml(params: &Parameters) -> Result<String> {
    Ok(serde_yaml::to_string(params)?)
}
