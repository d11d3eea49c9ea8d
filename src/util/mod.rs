//! Utility types shared by the archive interface and the scene engine.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam and archive/renderer conversions

mod error;
mod math;

pub use error::*;
pub use math::*;
