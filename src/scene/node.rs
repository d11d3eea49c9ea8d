//! Scene nodes and their kind-specific state.

use std::fmt;

use tracing::warn;

use super::payload::{CurveSet, Mesh, PointSet, PolyMeshSet, Polyline};
use super::render::Renderer;
use crate::core::{ObjectReader, SampleSelector};
use crate::geom::{ICurves, IPoints, IPolyMesh, IXform, SchemaKind};
use crate::util::{Chrono, Error, Mat4, Result, Vec3};

/// Index of a node inside its [`SceneGraph`](super::SceneGraph).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Node classification exposed to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Transform,
    Points,
    Curves,
    PolyMesh,
    Generic,
    Unknown,
}

impl NodeKind {
    /// Short diagnostic name; empty for structural nodes without geometry.
    pub fn type_name(self) -> &'static str {
        match self {
            NodeKind::Transform => "Xform",
            NodeKind::Points => "Points",
            NodeKind::Curves => "Curves",
            NodeKind::PolyMesh => "PolyMesh",
            NodeKind::Generic | NodeKind::Unknown => "",
        }
    }

    /// Kinds that carry a drawable payload.
    pub fn is_geometry(self) -> bool {
        matches!(self, NodeKind::Points | NodeKind::Curves | NodeKind::PolyMesh)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Kind-specific node state.
#[derive(Clone, Debug)]
pub enum NodeData {
    /// Synthetic top of the hierarchy.
    Root,
    Generic,
    /// Local matrix from the last evaluation.
    Transform { local: Mat4 },
    Points(PointSet),
    Curves(CurveSet),
    PolyMesh(PolyMeshSet),
}

impl NodeData {
    /// Initial state for an object of the given schema.
    pub(crate) fn for_schema(kind: SchemaKind) -> Self {
        match kind {
            SchemaKind::Xform => NodeData::Transform { local: Mat4::IDENTITY },
            SchemaKind::Points => NodeData::Points(PointSet::default()),
            SchemaKind::Curves => NodeData::Curves(CurveSet::default()),
            SchemaKind::PolyMesh => NodeData::PolyMesh(PolyMeshSet::default()),
            _ => NodeData::Generic,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Root => NodeKind::Unknown,
            NodeData::Generic => NodeKind::Generic,
            NodeData::Transform { .. } => NodeKind::Transform,
            NodeData::Points(_) => NodeKind::Points,
            NodeData::Curves(_) => NodeKind::Curves,
            NodeData::PolyMesh(_) => NodeKind::PolyMesh,
        }
    }
}

/// Closed time interval in seconds; may be empty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeRange {
    min: Chrono,
    max: Chrono,
}

impl TimeRange {
    /// Range that contributes nothing to a union.
    pub const EMPTY: Self = Self {
        min: Chrono::INFINITY,
        max: Chrono::NEG_INFINITY,
    };

    pub fn new(min: Chrono, max: Chrono) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// `(min, max)`, or `(0, 0)` when nothing in range is animated.
    pub fn bounds(&self) -> (Chrono, Chrono) {
        if self.is_empty() {
            (0.0, 0.0)
        } else {
            (self.min, self.max)
        }
    }

    pub fn min(&self) -> Chrono {
        self.bounds().0
    }

    pub fn max(&self) -> Chrono {
        self.bounds().1
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<Option<(Chrono, Chrono)>> for TimeRange {
    fn from(range: Option<(Chrono, Chrono)>) -> Self {
        range.map_or(Self::EMPTY, |(min, max)| Self::new(min, max))
    }
}

/// One archive object bound into the scene.
pub struct SceneNode {
    pub(crate) name: String,
    pub(crate) data: NodeData,
    pub(crate) object: Box<dyn ObjectReader>,
    pub(crate) time_range: TimeRange,
    pub(crate) children: Vec<NodeId>,
    pub(crate) world: Mat4,
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("time_range", &self.time_range)
            .field("children", &self.children)
            .finish()
    }
}

impl SceneNode {
    pub(crate) fn new(object: Box<dyn ObjectReader>, data: NodeData) -> Self {
        Self {
            name: object.full_name().to_string(),
            data,
            object,
            time_range: TimeRange::EMPTY,
            children: Vec::new(),
            world: Mat4::IDENTITY,
        }
    }

    /// Full hierarchical path, unique within the archive.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn is_type_of(&self, kind: NodeKind) -> bool {
        self.kind() == kind
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Union of this node's own sample range and every descendant's.
    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Transform passed into this node by its last evaluation.
    pub fn world_transform(&self) -> Mat4 {
        self.world
    }

    /// Archive object this node reads from.
    pub fn object(&self) -> &dyn ObjectReader {
        self.object.as_ref()
    }

    fn mismatch(&self, expected: NodeKind) -> Error {
        warn!(
            node = %self.name,
            "cast error: expected {}, node is {}",
            expected,
            self.kind()
        );
        Error::kind_mismatch(expected, self.kind())
    }

    pub fn as_point_set(&self) -> Result<&PointSet> {
        match &self.data {
            NodeData::Points(set) => Ok(set),
            _ => Err(self.mismatch(NodeKind::Points)),
        }
    }

    /// Point positions without ids.
    pub fn as_points(&self) -> Result<Vec<Vec3>> {
        self.as_point_set().map(PointSet::positions)
    }

    pub fn as_curve_set(&self) -> Result<&CurveSet> {
        match &self.data {
            NodeData::Curves(set) => Ok(set),
            _ => Err(self.mismatch(NodeKind::Curves)),
        }
    }

    pub fn as_polylines(&self) -> Result<Vec<Polyline>> {
        self.as_curve_set().map(|set| set.polylines().to_vec())
    }

    pub fn as_poly_mesh(&self) -> Result<&PolyMeshSet> {
        match &self.data {
            NodeData::PolyMesh(set) => Ok(set),
            _ => Err(self.mismatch(NodeKind::PolyMesh)),
        }
    }

    pub fn as_mesh(&self) -> Result<Mesh> {
        self.as_poly_mesh().map(|set| set.mesh().clone())
    }

    /// Evaluate this node at `time` under `inherited`.
    ///
    /// Returns the transform handed to every child.
    pub(crate) fn evaluate(&mut self, time: Chrono, inherited: &Mat4) -> Mat4 {
        self.world = *inherited;
        let object = self.object.as_ref();

        match &mut self.data {
            NodeData::Root | NodeData::Generic => *inherited,
            NodeData::Transform { local } => {
                let sample = IXform::new(object)
                    .map(|x| x.get_sample_at(SampleSelector::time_near(time)))
                    .transpose();
                match sample {
                    Ok(Some(sample)) => {
                        *local = sample.matrix();
                        if sample.inherits {
                            *inherited * *local
                        } else {
                            *local
                        }
                    }
                    Ok(None) => {
                        *local = Mat4::IDENTITY;
                        *inherited
                    }
                    Err(e) => {
                        warn!(node = %self.name, error = %e, "xform sample failed");
                        *local = Mat4::IDENTITY;
                        *inherited
                    }
                }
            }
            NodeData::Points(set) => {
                let result = match IPoints::new(object) {
                    Some(schema) => set.pull(&schema, time, inherited),
                    None => Err(Error::invalid_sample(object.full_name(), "no points schema")),
                };
                if let Err(e) = result {
                    warn!(node = %self.name, error = %e, "points sample failed");
                    set.clear();
                }
                *inherited
            }
            NodeData::Curves(set) => {
                let result = match ICurves::new(object) {
                    Some(schema) => set.pull(&schema, time, inherited),
                    None => Err(Error::invalid_sample(object.full_name(), "no curves schema")),
                };
                if let Err(e) = result {
                    warn!(node = %self.name, error = %e, "curves sample failed");
                    set.clear();
                }
                *inherited
            }
            NodeData::PolyMesh(set) => {
                let result = match IPolyMesh::new(object) {
                    Some(schema) => set.pull(&schema, time, inherited),
                    None => Err(Error::invalid_sample(object.full_name(), "no polymesh schema")),
                };
                if let Err(e) = result {
                    warn!(node = %self.name, error = %e, "polymesh sample failed");
                    set.clear();
                }
                *inherited
            }
        }
    }

    /// Render this node's own payload.
    pub(crate) fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        match &self.data {
            NodeData::Points(set) => renderer.draw_points(set),
            NodeData::Curves(set) => renderer.draw_polylines(set),
            NodeData::PolyMesh(set) => renderer.draw_mesh(set.mesh()),
            NodeData::Root | NodeData::Generic | NodeData::Transform { .. } => {}
        }
    }

    /// Render this node's own payload with `texture` bound for meshes.
    pub(crate) fn draw_textured<R: Renderer + ?Sized>(&self, renderer: &mut R, texture: &R::Texture) {
        match &self.data {
            NodeData::PolyMesh(set) => renderer.draw_mesh_textured(set.mesh(), texture),
            _ => self.draw(renderer),
        }
    }
}

/// Own sample range of an object, for animated schemas only.
pub(crate) fn own_time_range(kind: SchemaKind, object: &dyn ObjectReader) -> TimeRange {
    let range = match kind {
        SchemaKind::Xform => IXform::new(object).and_then(|s| s.time_range()),
        SchemaKind::Points => IPoints::new(object).and_then(|s| s.time_range()),
        SchemaKind::Curves => ICurves::new(object).and_then(|s| s.time_range()),
        SchemaKind::PolyMesh => IPolyMesh::new(object).and_then(|s| s.time_range()),
        _ => None,
    };
    range.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(NodeKind::Transform.type_name(), "Xform");
        assert_eq!(NodeKind::PolyMesh.type_name(), "PolyMesh");
        assert_eq!(NodeKind::Generic.type_name(), "");
        assert!(NodeKind::Curves.is_geometry());
        assert!(!NodeKind::Transform.is_geometry());
        assert_eq!(NodeData::Root.kind(), NodeKind::Unknown);
    }

    #[test]
    fn test_time_range_union() {
        let empty = TimeRange::EMPTY;
        assert!(empty.is_empty());
        assert_eq!(empty.bounds(), (0.0, 0.0));

        let a = TimeRange::new(1.0, 2.0);
        assert_eq!(empty.union(&a), a);
        assert_eq!(a.union(&TimeRange::new(-1.0, 1.5)).bounds(), (-1.0, 2.0));
        assert_eq!(TimeRange::from(None), TimeRange::EMPTY);
    }

    #[test]
    fn test_data_for_schema() {
        assert_eq!(NodeData::for_schema(SchemaKind::Xform).kind(), NodeKind::Transform);
        assert_eq!(NodeData::for_schema(SchemaKind::Points).kind(), NodeKind::Points);
        assert_eq!(NodeData::for_schema(SchemaKind::Other).kind(), NodeKind::Generic);
    }
}
