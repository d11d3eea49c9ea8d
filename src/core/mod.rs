//! Core layer - the archive access interface.
//!
//! This module provides:
//! - [`TimeSampling`] - Time sampling for animated schemas
//! - [`SampleSelector`] - Sample selection by index or time
//! - [`MetaData`] - Key-value metadata storage
//! - [`ObjectHeader`] - Headers for objects in the hierarchy
//! - [`ArchiveReader`] / [`ObjectReader`] - Backend reader traits

mod header;
mod metadata;
mod sample;
mod time_sampling;
mod traits;

pub use header::ObjectHeader;
pub use metadata::MetaData;
pub use sample::SampleSelector;
pub use time_sampling::{TimeSampling, TimeSamplingType};
pub use traits::{ArchiveReader, ObjectReader};
