//! PolyMesh (polygon mesh) schema.

use super::util::{impl_schema_common, wrong_sample};
use super::GeomSample;
use crate::core::{ObjectReader, SampleSelector};
use crate::util::{BBox3f, Result, Vec2, Vec3};

/// PolyMesh schema identifier.
pub const POLYMESH_SCHEMA: &str = "AbcGeom_PolyMesh_v1";

/// Polygon mesh sample data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolyMeshSample {
    /// Vertex positions (P).
    pub positions: Vec<Vec3>,
    /// Face vertex counts - number of vertices per face.
    pub face_counts: Vec<i32>,
    /// Face vertex indices - indices into positions array.
    pub face_indices: Vec<i32>,
    /// Normals, per vertex or per face-vertex (optional).
    pub normals: Option<Vec<Vec3>>,
    /// UV coordinates, per vertex or per face-vertex (optional).
    pub uvs: Option<Vec<Vec2>>,
}

impl PolyMeshSample {
    /// Create an empty sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Get number of faces.
    pub fn num_faces(&self) -> usize {
        self.face_counts.len()
    }

    /// Get total number of face-vertex indices.
    pub fn num_indices(&self) -> usize {
        self.face_indices.len()
    }

    /// Check if this is a drawable mesh (has positions and face data).
    pub fn is_valid(&self) -> bool {
        !self.positions.is_empty() && !self.face_counts.is_empty() && !self.face_indices.is_empty()
    }

    /// Check that face counts and indices agree with each other and the positions.
    pub fn is_consistent(&self) -> bool {
        let counted: i64 = self.face_counts.iter().map(|&c| c as i64).sum();
        self.face_counts.iter().all(|&c| c >= 0)
            && counted == self.face_indices.len() as i64
            && self
                .face_indices
                .iter()
                .all(|&i| i >= 0 && (i as usize) < self.positions.len())
    }

    /// Flat normal for each face (Y for degenerate faces).
    pub fn compute_face_normals(&self) -> Vec<Vec3> {
        let mut normals = Vec::with_capacity(self.face_counts.len());
        let mut idx = 0usize;

        for &count in &self.face_counts {
            let count = count.max(0) as usize;
            let corner = |k: usize| {
                self.face_indices
                    .get(idx + k)
                    .and_then(|&i| self.positions.get(i as usize))
                    .copied()
            };
            let normal = match (count >= 3, corner(0), corner(1), corner(2)) {
                (true, Some(v0), Some(v1), Some(v2)) => (v1 - v0).cross(v2 - v0).normalize_or_zero(),
                _ => Vec3::Y,
            };
            normals.push(if normal == Vec3::ZERO { Vec3::Y } else { normal });
            idx += count;
        }

        normals
    }

    /// Calculate bounding box.
    pub fn compute_bounds(&self) -> BBox3f {
        BBox3f::from_points(&self.positions)
    }
}

/// Input PolyMesh schema reader.
pub struct IPolyMesh<'a> {
    object: &'a dyn ObjectReader,
}

impl_schema_common!(IPolyMesh, POLYMESH_SCHEMA);

impl<'a> IPolyMesh<'a> {
    /// Read a sample at the given index.
    pub fn get_sample(&self, index: usize) -> Result<PolyMeshSample> {
        match self.object.read_sample(index)? {
            GeomSample::PolyMesh(sample) => Ok(sample),
            other => Err(wrong_sample(self.object, "polymesh", &other)),
        }
    }

    /// Read the sample chosen by `sel`; no samples reads as an empty mesh.
    pub fn get_sample_at(&self, sel: SampleSelector) -> Result<PolyMeshSample> {
        if self.num_samples() == 0 {
            return Ok(PolyMeshSample::new());
        }
        self.get_sample(self.sample_index(sel)?)
    }
}
