//! Points schema: point cloud / particle data.

use super::util::{impl_schema_common, wrong_sample};
use super::GeomSample;
use crate::core::{ObjectReader, SampleSelector};
use crate::util::{BBox3f, Result, Vec3};

/// Points schema identifier.
pub const POINTS_SCHEMA: &str = "AbcGeom_Points_v1";

/// Points sample data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointsSample {
    /// Point positions.
    pub positions: Vec<Vec3>,
    /// Point IDs (unique identifiers).
    pub ids: Vec<u64>,
}

impl PointsSample {
    /// Create empty sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of points.
    pub fn num_points(&self) -> usize {
        self.positions.len()
    }

    /// Check if sample has ID data for every point.
    pub fn has_ids(&self) -> bool {
        !self.ids.is_empty() && self.ids.len() == self.positions.len()
    }

    /// Compute bounding box.
    pub fn compute_bounds(&self) -> BBox3f {
        BBox3f::from_points(&self.positions)
    }
}

/// Input Points schema reader.
pub struct IPoints<'a> {
    object: &'a dyn ObjectReader,
}

impl_schema_common!(IPoints, POINTS_SCHEMA);

impl<'a> IPoints<'a> {
    /// Read a sample at the given index.
    pub fn get_sample(&self, index: usize) -> Result<PointsSample> {
        match self.object.read_sample(index)? {
            GeomSample::Points(sample) => Ok(sample),
            other => Err(wrong_sample(self.object, "points", &other)),
        }
    }

    /// Read the sample chosen by `sel`; no samples reads as an empty cloud.
    pub fn get_sample_at(&self, sel: SampleSelector) -> Result<PointsSample> {
        if self.num_samples() == 0 {
            return Ok(PointsSample::new());
        }
        self.get_sample(self.sample_index(sel)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_sample_empty() {
        let sample = PointsSample::new();
        assert_eq!(sample.num_points(), 0);
        assert!(!sample.has_ids());
        assert!(sample.compute_bounds().is_empty());
    }

    #[test]
    fn test_points_ids_must_cover_positions() {
        let sample = PointsSample {
            positions: vec![Vec3::ZERO, Vec3::ONE],
            ids: vec![7],
            ..Default::default()
        };
        assert!(!sample.has_ids());
        assert_eq!(sample.compute_bounds().max, Vec3::ONE);
    }
}
