//! Image statistics.
//!
//! Summary numbers for logging and the `--stats` report: min, max, mean,
//! median and mean absolute deviation, per plane and over the whole image.
//! Non-finite samples are skipped. The blackpoint stage reads the global
//! median when measuring against [`crate::blackpoint::BlackpointReference::Median`].

use std::fmt;

use nb_core::{Image, Plane, CHANNELS};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Statistics of one set of samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Summary {
    /// Number of finite samples.
    pub count: usize,
    /// Smallest sample.
    pub min: f64,
    /// Largest sample.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median (mean of the two middle samples for even counts).
    pub median: f64,
    /// Mean absolute deviation from the mean.
    pub mean_abs_dev: f64,
}

impl Summary {
    /// Summarizes `samples`. All fields are zero when nothing is finite.
    pub fn of(samples: &[f64]) -> Self {
        let mut finite: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Self::default();
        }

        let n = finite.len() as f64;
        let mean = finite.iter().sum::<f64>() / n;
        let mean_abs_dev = finite.iter().map(|v| (v - mean).abs()).sum::<f64>() / n;

        #[cfg(feature = "parallel")]
        finite.par_sort_unstable_by(f64::total_cmp);
        #[cfg(not(feature = "parallel"))]
        finite.sort_unstable_by(f64::total_cmp);

        let mid = finite.len() / 2;
        let median = if finite.len() % 2 == 0 {
            0.5 * (finite[mid - 1] + finite[mid])
        } else {
            finite[mid]
        };

        Self {
            count: finite.len(),
            min: finite[0],
            max: finite[finite.len() - 1],
            mean,
            median,
            mean_abs_dev,
        }
    }

    /// Summarizes one plane.
    pub fn of_plane(plane: &Plane) -> Self {
        Self::of(plane.data())
    }

    /// Summarizes every sample of every plane.
    pub fn of_image(image: &Image) -> Self {
        let all: Vec<f64> = image
            .planes()
            .iter()
            .flat_map(|p| p.data().iter().copied())
            .collect();
        Self::of(&all)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min {:.6}  max {:.6}  mean {:.6}  median {:.6}  mad {:.6}",
            self.min, self.max, self.mean, self.median, self.mean_abs_dev
        )
    }
}

/// Per-plane and global statistics of an [`Image`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageStats {
    /// R, G, B statistics.
    pub planes: [Summary; CHANNELS],
    /// Statistics over all samples of all planes.
    pub global: Summary,
}

impl ImageStats {
    /// Computes statistics of `image`.
    pub fn compute(image: &Image) -> Self {
        Self {
            planes: [0, 1, 2].map(|i| Summary::of_plane(image.plane(i))),
            global: Summary::of_image(image),
        }
    }
}

impl fmt::Display for ImageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, summary) in ["R", "G", "B"].iter().zip(&self.planes) {
            writeln!(f, "{name}    {summary}")?;
        }
        write!(f, "all  {}", self.global)
    }
}
