//! Command implementations.

pub mod process;
pub mod stats;
