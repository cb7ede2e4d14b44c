//! Error types for narrowband normalization.
//!
//! Every failure of the pipeline is a caller configuration or input-data
//! defect. Errors are detected eagerly when a stage is entered and returned
//! as-is: there are no partial results and no retries.
//!
//! # Usage
//!
//! ```rust
//! use nb_core::{Error, Result};
//!
//! fn check_boost(factor: f64) -> Result<()> {
//!     if factor < 0.0 {
//!         return Err(Error::invalid_parameter("sii_boost", factor, "must not be negative"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_boost(-1.0).unwrap_err().is_invalid_parameter());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while normalizing an image.
///
/// # Categories
///
/// - **Configuration**: [`InvalidParameter`](Error::InvalidParameter)
/// - **Data**: [`DomainError`](Error::DomainError)
/// - **Shape**: [`ShapeMismatch`](Error::ShapeMismatch), [`InvalidDimensions`](Error::InvalidDimensions)
#[derive(Debug, Error)]
pub enum Error {
    /// A numeric option is out of range, negative or not finite.
    ///
    /// # Example
    ///
    /// ```rust
    /// use nb_core::Error;
    ///
    /// let err = Error::invalid_parameter("blackpoint", 1.5, "must be within [0, 1]");
    /// assert!(err.to_string().contains("blackpoint"));
    /// ```
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Option name
        name: &'static str,
        /// Rejected value
        value: f64,
        /// Why the value was rejected
        reason: String,
    },

    /// A sample lies outside the range a conversion step can represent.
    ///
    /// Raised by the colour stage for non-finite samples, and for negative
    /// intensities in linear mode. Callers must pre-normalize.
    #[error("domain error in {stage}: sample {value} at index {index} {reason}")]
    DomainError {
        /// Stage that rejected the sample
        stage: &'static str,
        /// Offending sample
        value: f64,
        /// Flat sample index within its plane
        index: usize,
        /// Why the sample is out of domain
        reason: String,
    },

    /// Planes of differing dimensions met in one image or one stage.
    #[error("shape mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    ShapeMismatch {
        /// Expected width
        expected_width: u32,
        /// Expected height
        expected_height: u32,
        /// Actual width
        width: u32,
        /// Actual height
        height: u32,
    },

    /// Plane data does not match the declared dimensions.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Declared width
        width: u32,
        /// Declared height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidParameter`] error.
    #[inline]
    pub fn invalid_parameter(name: &'static str, value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::DomainError`] error.
    #[inline]
    pub fn domain(stage: &'static str, value: f64, index: usize, reason: impl Into<String>) -> Self {
        Self::DomainError {
            stage,
            value,
            index,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::ShapeMismatch`] error from `(width, height)` pairs.
    #[inline]
    pub fn shape_mismatch(expected: (u32, u32), got: (u32, u32)) -> Self {
        Self::ShapeMismatch {
            expected_width: expected.0,
            expected_height: expected.1,
            width: got.0,
            height: got.1,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is a configuration error.
    #[inline]
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }

    /// Returns `true` if this is a domain error.
    #[inline]
    pub fn is_domain_error(&self) -> bool {
        matches!(self, Self::DomainError { .. })
    }

    /// Returns `true` if this is a shape-related error.
    #[inline]
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. } | Self::InvalidDimensions { .. })
    }
}

/// Rejects non-finite values and values below zero.
///
/// Shared by every option that must be a non-negative real.
pub fn ensure_non_negative(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::invalid_parameter(name, value, "must be finite"));
    }
    if value < 0.0 {
        return Err(Error::invalid_parameter(name, value, "must not be negative"));
    }
    Ok(value)
}

/// Rejects non-finite values and values at or below zero.
pub fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::invalid_parameter(name, value, "must be finite"));
    }
    if value <= 0.0 {
        return Err(Error::invalid_parameter(name, value, "must be positive"));
    }
    Ok(value)
}
