//! Curves schema.
//!
//! Curves are read as their control vertices; the scene engine draws them
//! as polylines regardless of basis.

use super::util::{impl_schema_common, wrong_sample};
use super::GeomSample;
use crate::core::{ObjectReader, SampleSelector};
use crate::util::{Result, Vec3};

/// Curves schema identifier.
pub const CURVES_SCHEMA: &str = "AbcGeom_Curve_v2";

/// Curve periodicity (wrap mode).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CurvePeriodicity {
    /// Non-periodic (open) curves
    #[default]
    NonPeriodic,
    /// Periodic (closed) curves
    Periodic,
}

/// Curves sample data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurvesSample {
    /// Curve positions (all curves concatenated).
    pub positions: Vec<Vec3>,
    /// Number of vertices per curve.
    pub num_vertices: Vec<i32>,
    /// Periodicity (wrap mode).
    pub wrap: CurvePeriodicity,
}

impl CurvesSample {
    /// Create empty sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of curves.
    pub fn num_curves(&self) -> usize {
        self.num_vertices.len()
    }

    /// Get total vertex count.
    pub fn total_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Check that the per-curve counts add up to the stored positions.
    pub fn is_consistent(&self) -> bool {
        self.num_vertices.iter().all(|&n| n >= 0)
            && self.num_vertices.iter().map(|&n| n as usize).sum::<usize>() == self.positions.len()
    }

    /// Iterate over the vertices of each curve.
    ///
    /// Stops at the first curve whose count runs past the stored positions.
    pub fn curves(&self) -> impl Iterator<Item = &[Vec3]> + '_ {
        let mut start = 0usize;
        self.num_vertices.iter().map_while(move |&n| {
            let count = usize::try_from(n).ok()?;
            let slice = self.positions.get(start..start + count)?;
            start += count;
            Some(slice)
        })
    }
}

/// Input Curves schema reader.
pub struct ICurves<'a> {
    object: &'a dyn ObjectReader,
}

impl_schema_common!(ICurves, CURVES_SCHEMA);

impl<'a> ICurves<'a> {
    /// Read a sample at the given index.
    pub fn get_sample(&self, index: usize) -> Result<CurvesSample> {
        match self.object.read_sample(index)? {
            GeomSample::Curves(sample) => Ok(sample),
            other => Err(wrong_sample(self.object, "curves", &other)),
        }
    }

    /// Read the sample chosen by `sel`; no samples reads as no curves.
    pub fn get_sample_at(&self, sel: SampleSelector) -> Result<CurvesSample> {
        if self.num_samples() == 0 {
            return Ok(CurvesSample::new());
        }
        self.get_sample(self.sample_index(sel)?)
    }
}
