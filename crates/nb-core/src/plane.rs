//! Single-channel sample planes.
//!
//! A [`Plane`] is a row-major `width × height` grid of `f64` samples. The
//! buffer lives behind an [`Arc`], so cloning a plane is free and stages that
//! pass a plane through unchanged keep it bit-identical.
//!
//! # Memory Layout
//!
//! ```text
//! index = y * width + x
//! Memory: [s(0,0) s(1,0) ... s(w-1,0)]  ← Row 0
//!         [s(0,1) s(1,1) ... s(w-1,1)]  ← Row 1
//! ```
//!
//! # Dependencies
//!
//! - [`rayon`] - Parallel sample maps (feature `parallel`)

use crate::{Error, Result};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One two-dimensional floating-point channel.
///
/// # Example
///
/// ```rust
/// use nb_core::Plane;
///
/// let plane = Plane::from_data(2, 1, vec![0.25, 0.75]).unwrap();
/// let half = plane.map(|v| v * 0.5);
/// assert_eq!(half.data(), &[0.125, 0.375]);
/// ```
#[derive(Debug, Clone)]
pub struct Plane {
    /// Sample buffer (Arc for cheap cloning)
    data: Arc<Vec<f64>>,
    /// Plane width in samples
    width: u32,
    /// Plane height in samples
    height: u32,
}

impl Plane {
    /// Creates a plane from existing sample data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len() != width * height`.
    pub fn from_data(width: u32, height: u32, data: Vec<f64>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} samples, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
        })
    }

    /// Wraps a buffer whose length is already known to match.
    pub(crate) fn from_parts(width: u32, height: u32, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        Self {
            data: Arc::new(data),
            width,
            height,
        }
    }

    /// Creates a plane with every sample set to `value`.
    pub fn filled(width: u32, height: u32, value: f64) -> Self {
        Self {
            data: Arc::new(vec![value; width as usize * height as usize]),
            width,
            height,
        }
    }

    /// Creates a plane filled with zeros.
    #[inline]
    pub fn zeros(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0.0)
    }

    /// Plane width in samples.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Plane height in samples.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` pair.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` for a plane without samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw row-major samples.
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Sample at `(x, y)`, or `None` outside the plane.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Consumes the plane and returns its samples, copying only if shared.
    pub fn into_data(self) -> Vec<f64> {
        Arc::try_unwrap(self.data).unwrap_or_else(|shared| (*shared).clone())
    }

    /// Returns `true` if both planes point at the same buffer.
    #[inline]
    pub fn shares_data(&self, other: &Plane) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Returns `true` if `other` has the same dimensions.
    #[inline]
    pub fn same_shape(&self, other: &Plane) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Fails with [`Error::ShapeMismatch`] unless `other` has the same dimensions.
    pub fn ensure_same_shape(&self, other: &Plane) -> Result<()> {
        if self.same_shape(other) {
            Ok(())
        } else {
            Err(Error::shape_mismatch(self.dimensions(), other.dimensions()))
        }
    }

    /// Applies `f` to every sample and returns a new plane of the same shape.
    pub fn map<F>(&self, f: F) -> Plane
    where
        F: Fn(f64) -> f64 + Send + Sync,
    {
        #[cfg(feature = "parallel")]
        let data: Vec<f64> = self.data.par_iter().map(|&v| f(v)).collect();
        #[cfg(not(feature = "parallel"))]
        let data: Vec<f64> = self.data.iter().map(|&v| f(v)).collect();

        Self {
            data: Arc::new(data),
            width: self.width,
            height: self.height,
        }
    }

    /// Combines two planes sample by sample.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the planes differ in dimensions.
    pub fn zip_map<F>(&self, other: &Plane, f: F) -> Result<Plane>
    where
        F: Fn(f64, f64) -> f64 + Send + Sync,
    {
        self.ensure_same_shape(other)?;

        #[cfg(feature = "parallel")]
        let data: Vec<f64> = self
            .data
            .par_iter()
            .zip(other.data.par_iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let data: Vec<f64> = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| f(a, b))
            .collect();

        Ok(Self {
            data: Arc::new(data),
            width: self.width,
            height: self.height,
        })
    }

    /// Smallest sample, ignoring NaN. `None` for an empty plane.
    pub fn min(&self) -> Option<f64> {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .reduce(f64::min)
    }

    /// Largest sample, ignoring NaN. `None` for an empty plane.
    pub fn max(&self) -> Option<f64> {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .reduce(f64::max)
    }

    /// First sample (with its index) that satisfies `predicate`.
    pub fn find(&self, predicate: impl Fn(f64) -> bool) -> Option<(usize, f64)> {
        self.data
            .iter()
            .copied()
            .enumerate()
            .find(|&(_, v)| predicate(v))
    }
}

impl PartialEq for Plane {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions() && self.data == other.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_data_checks_length() {
        assert!(Plane::from_data(2, 2, vec![0.0; 4]).is_ok());
        let err = Plane::from_data(2, 2, vec![0.0; 3]).unwrap_err();
        assert!(err.is_shape_error());
    }

    #[test]
    fn test_get_row_major() {
        let plane = Plane::from_data(3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(plane.get(0, 0), Some(0.0));
        assert_eq!(plane.get(2, 0), Some(2.0));
        assert_eq!(plane.get(1, 1), Some(4.0));
        assert_eq!(plane.get(3, 0), None);
        assert_eq!(plane.get(0, 2), None);
    }

    #[test]
    fn test_clone_shares_buffer() {
        let plane = Plane::filled(4, 4, 0.5);
        let copy = plane.clone();
        assert!(copy.shares_data(&plane));
        assert!(!plane.map(|v| v).shares_data(&plane));
    }

    #[test]
    fn test_zip_map_rejects_mismatch() {
        let a = Plane::filled(2, 2, 1.0);
        let b = Plane::filled(2, 3, 1.0);
        assert!(a.zip_map(&b, |x, y| x + y).unwrap_err().is_shape_error());

        let c = Plane::filled(2, 2, 2.0);
        let sum = a.zip_map(&c, |x, y| x + y).unwrap();
        assert!(sum.data().iter().all(|&v| v == 3.0));
    }

    #[test]
    fn test_min_max_skip_nan() {
        let plane = Plane::from_data(4, 1, vec![0.3, f64::NAN, -0.1, 0.9]).unwrap();
        assert_eq!(plane.min(), Some(-0.1));
        assert_eq!(plane.max(), Some(0.9));
        assert_eq!(Plane::zeros(0, 0).max(), None);
    }

    #[test]
    fn test_into_data_unshared() {
        let plane = Plane::from_data(2, 1, vec![1.0, 2.0]).unwrap();
        assert_eq!(plane.into_data(), vec![1.0, 2.0]);
    }
}
