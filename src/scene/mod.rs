//! Time-sampled scene evaluation.
//!
//! - [`Session`] - opens an archive and exposes the evaluated scene
//! - [`SceneGraph`] / [`SceneNode`] - the node hierarchy and per-kind state
//! - [`LookupTable`] - geometry nodes flattened by full name
//! - [`PointSet`], [`CurveSet`], [`PolyMeshSet`] - evaluated payloads
//! - [`Renderer`] - draw-call sink supplied by the host
//! - [`Playback`] - frame clock for looping playback
//!
//! Evaluation always picks the sample nearest to the requested time; no
//! interpolation happens between samples.

mod graph;
mod lookup;
mod node;
mod payload;
mod playback;
mod render;
mod session;

pub use graph::SceneGraph;
pub use lookup::{LookupTable, NodeKey};
pub use node::{NodeData, NodeId, NodeKind, SceneNode, TimeRange};
pub use payload::{CurveSet, Mesh, Point, PointSet, PolyMeshSet, Polyline, Vertex, NO_POINT_ID};
pub use playback::{wrap_time, Playback};
pub use render::{DrawStats, Renderer};
pub use session::Session;
