//! Shared sampling helpers for schema readers.

use super::GeomSample;
use crate::core::{ObjectReader, SampleSelector};
use crate::util::{Chrono, Error, Result};

/// A schema is constant when it holds at most one sample.
pub(crate) fn is_constant(object: &dyn ObjectReader) -> bool {
    object.num_samples() <= 1
}

/// Own sample time range of an animated schema.
pub(crate) fn time_range(object: &dyn ObjectReader) -> Option<(Chrono, Chrono)> {
    if is_constant(object) {
        return None;
    }
    object.time_sampling().time_range(object.num_samples())
}

/// Resolve a selector against the object's sampling.
pub(crate) fn resolve_index(object: &dyn ObjectReader, sel: SampleSelector) -> Result<usize> {
    sel.resolve(object.time_sampling(), object.num_samples())
        .ok_or(Error::SampleOutOfBounds { index: 0, count: 0 })
}

/// Methods every schema reader shares. Expects a field `object: &dyn ObjectReader`.
macro_rules! impl_schema_common {
    ($reader:ident, $schema:expr) => {
        impl<'a> $reader<'a> {
            /// Wrap an object reader.
            /// Returns None if the object doesn't carry this schema.
            pub fn new(object: &'a dyn $crate::core::ObjectReader) -> Option<Self> {
                if object.matches_schema($schema) {
                    Some(Self { object })
                } else {
                    None
                }
            }

            /// Get the underlying object.
            pub fn object(&self) -> &'a dyn $crate::core::ObjectReader {
                self.object
            }

            /// Get the object name.
            pub fn name(&self) -> &str {
                self.object.name()
            }

            /// Get the full path.
            pub fn full_name(&self) -> &str {
                self.object.full_name()
            }

            /// Get number of samples.
            pub fn num_samples(&self) -> usize {
                self.object.num_samples()
            }

            /// Check if the schema is constant (one sample or none).
            pub fn is_constant(&self) -> bool {
                $crate::geom::util::is_constant(self.object)
            }

            /// Time sampling of the schema.
            pub fn time_sampling(&self) -> &$crate::core::TimeSampling {
                self.object.time_sampling()
            }

            /// Time of the sample at `index`.
            pub fn sample_time(&self, index: usize) -> $crate::util::Chrono {
                self.object.time_sampling().sample_time(index)
            }

            /// First and last sample times, for animated schemas only.
            pub fn time_range(&self) -> Option<($crate::util::Chrono, $crate::util::Chrono)> {
                $crate::geom::util::time_range(self.object)
            }

            /// Resolve a selector to a sample index.
            pub fn sample_index(
                &self,
                sel: $crate::core::SampleSelector,
            ) -> $crate::util::Result<usize> {
                $crate::geom::util::resolve_index(self.object, sel)
            }
        }
    };
}

pub(crate) use impl_schema_common;

/// Error for a sample whose kind does not match the reader's schema.
pub(crate) fn wrong_sample(object: &dyn ObjectReader, expected: &str, found: &GeomSample) -> Error {
    Error::invalid_sample(
        object.full_name(),
        format!("expected a {expected} sample, got {:?}", found.kind()),
    )
}
