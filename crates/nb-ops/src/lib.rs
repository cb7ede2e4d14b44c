//! # nb-ops
//!
//! Normalization stages for narrowband composites, and the pipeline that
//! chains them.
//!
//! # Modules
//!
//! - [`booster`] - SII / OIII gain
//! - [`blackpoint`] - Background clip with rescale, against the peak or the median
//! - [`scnr`] - Green cap
//! - [`tone`] - Highlight recovery and reduction, gamma, brightness, final clip
//! - [`stats`] - Image statistics for reporting
//! - [`params`] - [`Parameters`] and its builder
//! - [`pipeline`] - [`Pipeline`] and its [`Stage`]s
//!
//! The colour stage lives in `nb-color` and is wired in by [`Pipeline`].
//!
//! # Example
//!
//! ```rust
//! use nb_core::{Image, Palette, Plane};
//! use nb_ops::{Parameters, Pipeline};
//!
//! let image = Image::from_planes(
//!     Plane::filled(4, 4, 0.6),
//!     Plane::filled(4, 4, 0.2),
//!     Plane::filled(4, 4, 0.3),
//! )
//! .unwrap();
//!
//! let params = Parameters::builder()
//!     .palette(Palette::Hso)
//!     .sii_boost(2.0)
//!     .build()
//!     .unwrap();
//!
//! let out = Pipeline::new(params).unwrap().run(image).unwrap();
//! assert!((out.plane(1).data()[0] - 0.4).abs() < 1e-12);
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` - rayon for per-sample work (enabled by default)
//! - `serde` - Serialize [`Parameters`] and the enums it holds

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod blackpoint;
pub mod booster;
pub mod params;
pub mod pipeline;
pub mod scnr;
pub mod stats;
pub mod tone;

pub use blackpoint::{clip_blackpoint, clip_blackpoint_with, BlackpointReference};
pub use booster::boost;
pub use params::{Parameters, ParametersBuilder};
pub use pipeline::{Pipeline, Stage};
pub use scnr::{scnr, ScnrMethod};
pub use stats::{ImageStats, Summary};
pub use tone::{clip_to_display, shape_tones, ToneCurve};

pub use nb_color::LightnessMode;
