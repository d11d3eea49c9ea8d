//! Abstract reader traits for archives and objects.
//!
//! These traits are the seam between an archive backend (which owns the
//! on-disk decoding) and the scene engine. Handles are owned so that scene
//! nodes can keep their binding across time evaluations.

use crate::core::{MetaData, ObjectHeader, TimeSampling};
use crate::geom::GeomSample;
use crate::util::Result;

// ============================================================================
// Archive Traits
// ============================================================================

/// Reader interface for an archive.
pub trait ArchiveReader: Send + Sync {
    /// Get the archive name/path.
    fn name(&self) -> &str;

    /// Get the archive-level metadata.
    fn archive_metadata(&self) -> &MetaData;

    /// Get the number of time samplings in the archive.
    fn num_time_samplings(&self) -> usize;

    /// Get a time sampling by index.
    fn time_sampling(&self, index: usize) -> Option<&TimeSampling>;

    /// Get the top object of the hierarchy.
    fn root(&self) -> Box<dyn ObjectReader>;

    /// Whether the archive opened cleanly and can be read.
    fn valid(&self) -> bool {
        true
    }
}

// ============================================================================
// Object Traits
// ============================================================================

/// Reader interface for an object in the hierarchy.
pub trait ObjectReader: Send + Sync {
    /// Get the object header.
    fn header(&self) -> &ObjectHeader;

    /// Whether the object binding is usable.
    fn valid(&self) -> bool {
        true
    }

    /// Get the number of child objects.
    fn num_children(&self) -> usize;

    /// Get header of child object at index without creating a reader.
    fn child_header(&self, index: usize) -> Option<&ObjectHeader>;

    /// Get a child by index.
    fn child(&self, index: usize) -> Option<Box<dyn ObjectReader>>;

    /// Time sampling of the object's schema samples.
    fn time_sampling(&self) -> &TimeSampling;

    /// Number of schema samples stored for this object.
    fn num_samples(&self) -> usize;

    /// Read the schema sample at `index`.
    fn read_sample(&self, index: usize) -> Result<GeomSample>;

    /// Get object name (convenience).
    fn name(&self) -> &str {
        &self.header().name
    }

    /// Get full path (convenience).
    fn full_name(&self) -> &str {
        &self.header().full_name
    }

    /// Check if object matches a schema.
    fn matches_schema(&self, schema: &str) -> bool {
        self.header().meta_data.matches_schema(schema)
    }

    /// Get a child by name.
    fn child_by_name(&self, name: &str) -> Option<Box<dyn ObjectReader>> {
        (0..self.num_children())
            .find(|&i| self.child_header(i).is_some_and(|h| h.name == name))
            .and_then(|i| self.child(i))
    }
}
