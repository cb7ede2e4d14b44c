//! # nb-core
//!
//! Core types for narrowband image normalization.
//!
//! This crate provides the foundational types used by every other crate of
//! the workspace:
//!
//! - [`Plane`] - One two-dimensional floating-point channel
//! - [`Image`] - An ordered (R, G, B) triple of equally shaped planes
//! - [`Mode`] - Whether samples are sensor-linear or already display-stretched
//! - [`EmissionLine`], [`Palette`] - Which narrowband line feeds which plane
//! - [`Error`], [`Result`] - Unified error handling
//!
//! ## Design Philosophy
//!
//! Images are immutable values. Every processing stage takes an `&Image` and
//! returns a new `Image`; planes are reference counted so stages that leave a
//! plane untouched hand it on without copying a single sample:
//!
//! ```
//! use nb_core::{Image, Plane};
//!
//! let r = Plane::filled(2, 2, 0.2);
//! let g = Plane::filled(2, 2, 0.3);
//! let b = Plane::filled(2, 2, 0.1);
//! let image = Image::from_planes(r, g, b).unwrap();
//!
//! let doubled = image.with_plane(1, image.plane(1).map(|v| v * 2.0));
//! assert!(doubled.plane(0).shares_data(image.plane(0)));
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//! nb-core (this crate)
//!    ^
//!    +-- nb-color (sRGB transfer, XYZ / L*a*b* conversion)
//!    +-- nb-ops   (booster, blackpoint, SCNR, tone shaping, pipeline)
//!    +-- nb-cli   (nbnorm binary)
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` - Run per-sample maps on the rayon pool (enabled by default)
//! - `serde` - Serialize [`Mode`], [`EmissionLine`] and [`Palette`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod channel;
pub mod error;
pub mod image;
pub mod mode;
pub mod plane;

pub use channel::{EmissionLine, Palette};
pub use error::{Error, Result};
pub use image::{Image, CHANNELS};
pub use mode::Mode;
pub use plane::Plane;

/// Display white: the top of the valid output range `[0, DISPLAY_WHITE]`.
pub const DISPLAY_WHITE: f64 = 1.0;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::channel::{EmissionLine, Palette};
    pub use crate::error::{Error, Result};
    pub use crate::image::Image;
    pub use crate::mode::Mode;
    pub use crate::plane::Plane;
    pub use crate::DISPLAY_WHITE;
}
