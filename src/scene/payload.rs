//! Per-kind geometry snapshots.
//!
//! Each container holds one evaluated sample with the node's accumulated
//! transform already baked in, so renderers and callers see world-space data.
//! A container is replaced wholesale on every evaluation.

use bytemuck::{Pod, Zeroable};

use crate::core::SampleSelector;
use crate::geom::{CurvePeriodicity, CurvesSample, ICurves, IPoints, IPolyMesh, PointsSample, PolyMeshSample};
use crate::util::{normal_matrix, BBox3f, Chrono, Mat4, Result, Vec2, Vec3};

/// Id given to points whose sample carries no ids.
pub const NO_POINT_ID: u64 = u64::MAX;

/// A single particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub id: u64,
    pub position: Vec3,
}

impl Point {
    pub fn new(id: u64, position: Vec3) -> Self {
        Self { id, position }
    }

    /// Point without an identifier.
    pub fn anonymous(position: Vec3) -> Self {
        Self { id: NO_POINT_ID, position }
    }
}

/// Ordered run of connected points.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<Vec3>,
    /// Last point connects back to the first.
    pub closed: bool,
}

impl Polyline {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of line segments drawn for this polyline.
    pub fn num_segments(&self) -> usize {
        match self.points.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }
}

/// Interleaved vertex layout for GPU upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Triangle mesh expanded per face-vertex.
///
/// `normals` always matches `positions`; `uvs` is either empty or matches
/// `positions` too.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }

    /// Interleaved vertex buffer; missing UVs read as zero.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, p)| Vertex {
                position: p.to_array(),
                normal: self.normals.get(i).copied().unwrap_or(Vec3::Y).to_array(),
                uv: self.uvs.get(i).copied().unwrap_or(Vec2::ZERO).to_array(),
            })
            .collect()
    }

    /// Raw bytes of [`Mesh::vertices`], ready for a vertex buffer.
    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.vertices()).to_vec()
    }

    pub fn bounds(&self) -> BBox3f {
        BBox3f::from_points(&self.positions)
    }
}

// ============================================================================
// PointSet
// ============================================================================

/// Evaluated point cloud.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    /// Bake a sample through `transform`.
    pub fn from_sample(sample: &PointsSample, transform: &Mat4) -> Self {
        let ids = sample.has_ids().then_some(&sample.ids);
        let points = sample
            .positions
            .iter()
            .enumerate()
            .map(|(i, p)| Point {
                id: ids.map_or(NO_POINT_ID, |ids| ids[i]),
                position: transform.transform_point3(*p),
            })
            .collect();
        Self { points }
    }

    /// Replace the contents with the sample nearest to `time`.
    pub fn pull(&mut self, schema: &IPoints<'_>, time: Chrono, transform: &Mat4) -> Result<()> {
        let sample = schema.get_sample_at(SampleSelector::time_near(time))?;
        *self = Self::from_sample(&sample, transform);
        Ok(())
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.points.iter().map(|p| p.position).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn bounds(&self) -> BBox3f {
        let mut b = BBox3f::EMPTY;
        for p in &self.points {
            b.expand_by_point(p.position);
        }
        b
    }
}

// ============================================================================
// CurveSet
// ============================================================================

/// Evaluated curves, one polyline per curve.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurveSet {
    polylines: Vec<Polyline>,
}

impl CurveSet {
    /// Bake a sample through `transform`.
    pub fn from_sample(sample: &CurvesSample, transform: &Mat4) -> Self {
        let closed = sample.wrap == CurvePeriodicity::Periodic;
        let polylines = sample
            .curves()
            .map(|curve| Polyline {
                points: curve.iter().map(|p| transform.transform_point3(*p)).collect(),
                closed,
            })
            .collect();
        Self { polylines }
    }

    /// Replace the contents with the sample nearest to `time`.
    pub fn pull(&mut self, schema: &ICurves<'_>, time: Chrono, transform: &Mat4) -> Result<()> {
        let sample = schema.get_sample_at(SampleSelector::time_near(time))?;
        *self = Self::from_sample(&sample, transform);
        Ok(())
    }

    pub fn polylines(&self) -> &[Polyline] {
        &self.polylines
    }

    pub fn len(&self) -> usize {
        self.polylines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty()
    }

    pub fn clear(&mut self) {
        self.polylines.clear();
    }
}

// ============================================================================
// PolyMeshSet
// ============================================================================

/// Per-face-vertex attribute layout inferred from its length.
enum Varying<'a, T> {
    FaceVarying(&'a [T]),
    Vertex(&'a [T]),
    Absent,
}

impl<'a, T: Copy> Varying<'a, T> {
    fn detect(values: Option<&'a Vec<T>>, num_indices: usize, num_positions: usize) -> Self {
        match values {
            Some(v) if !v.is_empty() && v.len() == num_indices => Varying::FaceVarying(v),
            Some(v) if !v.is_empty() && v.len() == num_positions => Varying::Vertex(v),
            _ => Varying::Absent,
        }
    }

    fn get(&self, face_vertex: usize, vertex: usize) -> Option<T> {
        match self {
            Varying::FaceVarying(v) => v.get(face_vertex).copied(),
            Varying::Vertex(v) => v.get(vertex).copied(),
            Varying::Absent => None,
        }
    }

    fn is_absent(&self) -> bool {
        matches!(self, Varying::Absent)
    }
}

/// Evaluated polygon mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolyMeshSet {
    mesh: Mesh,
}

impl PolyMeshSet {
    /// Triangulate a sample and bake it through `transform`.
    ///
    /// Faces are fan-triangulated. Faces with fewer than three corners or
    /// with indices outside the position list are skipped.
    pub fn from_sample(sample: &PolyMeshSample, transform: &Mat4) -> Self {
        let num_indices = sample.face_indices.len();
        let num_positions = sample.positions.len();
        let normals = Varying::detect(sample.normals.as_ref(), num_indices, num_positions);
        let uvs = Varying::detect(sample.uvs.as_ref(), num_indices, num_positions);
        let face_normals = if normals.is_absent() {
            sample.compute_face_normals()
        } else {
            Vec::new()
        };
        let to_world_normal = normal_matrix(transform);

        let tri_count: usize = sample
            .face_counts
            .iter()
            .map(|&c| (c.max(0) as usize).saturating_sub(2))
            .sum();
        let mut mesh = Mesh {
            positions: Vec::with_capacity(tri_count * 3),
            normals: Vec::with_capacity(tri_count * 3),
            uvs: Vec::new(),
            indices: Vec::with_capacity(tri_count * 3),
        };

        let mut offset = 0usize;
        for (face, &count) in sample.face_counts.iter().enumerate() {
            let count = count.max(0) as usize;
            let start = offset;
            offset += count;

            let Some(corners) = sample.face_indices.get(start..start + count) else {
                break;
            };
            if count < 3
                || corners
                    .iter()
                    .any(|&i| i < 0 || i as usize >= num_positions)
            {
                continue;
            }

            for k in 1..count - 1 {
                for corner in [0, k, k + 1] {
                    let fv = start + corner;
                    let v = corners[corner] as usize;

                    let normal = normals
                        .get(fv, v)
                        .or_else(|| face_normals.get(face).copied())
                        .unwrap_or(Vec3::Y);

                    mesh.indices.push(mesh.positions.len() as u32);
                    mesh.positions.push(transform.transform_point3(sample.positions[v]));
                    mesh.normals.push((to_world_normal * normal).normalize_or_zero());
                    if let Some(uv) = uvs.get(fv, v) {
                        mesh.uvs.push(uv);
                    }
                }
            }
        }

        // Partially present UVs would misalign with the vertices.
        if mesh.uvs.len() != mesh.positions.len() {
            mesh.uvs.clear();
        }

        Self { mesh }
    }

    /// Replace the contents with the sample nearest to `time`.
    pub fn pull(&mut self, schema: &IPolyMesh<'_>, time: Chrono, transform: &Mat4) -> Result<()> {
        let sample = schema.get_sample_at(SampleSelector::time_near(time))?;
        *self = Self::from_sample(&sample, transform);
        Ok(())
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }

    pub fn clear(&mut self) {
        self.mesh = Mesh::default();
    }
}
