//! # nb-color
//!
//! Colour conversions for narrowband normalization.
//!
//! - [`transfer`] - sRGB EOTF / OETF
//! - [`lab`] - RGB ⇄ XYZ ⇄ CIE L\*a\*b\* (D65), [`LabImage`]
//! - [`lightness`] - Replacing L\* from one emission line
//!
//! ## Example
//!
//! ```rust
//! use nb_color::{convert_with_lightness, LightnessMode};
//! use nb_core::{Image, Mode, Palette, Plane};
//!
//! let image = Image::from_planes(
//!     Plane::filled(2, 2, 0.2),
//!     Plane::filled(2, 2, 0.3),
//!     Plane::filled(2, 2, 0.1),
//! )
//! .unwrap();
//!
//! let out = convert_with_lightness(&image, Mode::NonLinear, Palette::Hso, LightnessMode::Original)
//!     .unwrap();
//! assert!((out.plane(1).data()[0] - 0.3).abs() < 1e-9);
//! ```

#![warn(missing_docs)]

pub mod lab;
pub mod lightness;
pub mod transfer;

pub use lab::{from_lab, to_lab, LabImage};
pub use lightness::{convert_with_lightness, select_lightness, LightnessMode};
