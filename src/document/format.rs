//! Serialized layout of a scene document.
//!
//! ```json
//! {
//!   "metadata": { "_ai_Application": "houdini" },
//!   "time_samplings": [ { "type": "uniform", "time_per_cycle": 0.5 } ],
//!   "root": {
//!     "name": "ABC",
//!     "children": [
//!       { "name": "A", "schema": "AbcGeom_Xform_v3", "time_sampling": 1,
//!         "samples": [ { "ops": [ { "translate": [0, 1, 0] } ] } ],
//!         "children": [ ... ] }
//!     ]
//!   }
//! }
//! ```
//!
//! Time sampling index 0 is the implicit identity sampling; listed
//! samplings start at index 1.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::core::TimeSampling;
use crate::geom::{
    CurvePeriodicity, CurvesSample, GeomSample, PointsSample, PolyMeshSample, SchemaKind,
    XformOp, XformSample,
};
use crate::util::{vec2_from_array, vec3_from_array};

/// Whole document as stored on disk.
#[derive(Debug, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub time_samplings: Vec<TimeSamplingDoc>,
    pub root: ObjectDoc,
}

/// Stored time sampling.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimeSamplingDoc {
    Identity,
    Uniform {
        time_per_cycle: f64,
        #[serde(default)]
        start_time: f64,
    },
    Cyclic {
        time_per_cycle: f64,
        times: Vec<f64>,
    },
    Acyclic {
        times: Vec<f64>,
    },
}

impl From<TimeSamplingDoc> for TimeSampling {
    fn from(doc: TimeSamplingDoc) -> Self {
        match doc {
            TimeSamplingDoc::Identity => TimeSampling::IDENTITY,
            TimeSamplingDoc::Uniform { time_per_cycle, start_time } => {
                TimeSampling::uniform(time_per_cycle, start_time)
            }
            TimeSamplingDoc::Cyclic { time_per_cycle, times } => {
                TimeSampling::cyclic(time_per_cycle, times)
            }
            TimeSamplingDoc::Acyclic { times } => TimeSampling::acyclic(times),
        }
    }
}

/// Stored object with its schema samples and children.
#[derive(Debug, Deserialize)]
pub struct ObjectDoc {
    pub name: String,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub time_sampling: usize,
    /// Samples, decoded against `schema` by [`decode_sample`].
    #[serde(default)]
    pub samples: Vec<Value>,
    #[serde(default)]
    pub children: Vec<ObjectDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolyMeshDoc {
    pub positions: Vec<[f32; 3]>,
    pub face_counts: Vec<i32>,
    pub face_indices: Vec<i32>,
    #[serde(default)]
    pub normals: Option<Vec<[f32; 3]>>,
    #[serde(default)]
    pub uvs: Option<Vec<[f32; 2]>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurvesDoc {
    pub positions: Vec<[f32; 3]>,
    pub num_vertices: Vec<i32>,
    #[serde(default)]
    pub periodic: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointsDoc {
    #[serde(default)]
    pub positions: Vec<[f32; 3]>,
    #[serde(default)]
    pub ids: Vec<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct XformDoc {
    #[serde(default)]
    pub ops: Vec<XformOpDoc>,
    #[serde(default = "default_inherits")]
    pub inherits: bool,
}

fn default_inherits() -> bool {
    true
}

/// Stored transform operation, e.g. `{ "rotate_y": 90 }`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XformOpDoc {
    Translate([f64; 3]),
    Scale([f64; 3]),
    RotateX(f64),
    RotateY(f64),
    RotateZ(f64),
    Rotate([f64; 4]),
    Matrix([f64; 16]),
}

impl From<XformOpDoc> for XformOp {
    fn from(doc: XformOpDoc) -> Self {
        match doc {
            XformOpDoc::Translate([x, y, z]) => XformOp::translate(x, y, z),
            XformOpDoc::Scale([x, y, z]) => XformOp::scale(x, y, z),
            XformOpDoc::RotateX(a) => XformOp::rotate_x(a),
            XformOpDoc::RotateY(a) => XformOp::rotate_y(a),
            XformOpDoc::RotateZ(a) => XformOp::rotate_z(a),
            XformOpDoc::Rotate([x, y, z, a]) => XformOp::rotate([x, y, z], a),
            XformOpDoc::Matrix(m) => XformOp::matrix(m),
        }
    }
}

/// Decode one stored sample as the sample type of the `kind` schema.
///
/// Schemas without a sample reader yield `None`.
pub fn decode_sample(kind: SchemaKind, value: Value) -> serde_json::Result<Option<GeomSample>> {
    let sample = match kind {
        SchemaKind::Xform => serde_json::from_value::<XformDoc>(value)?.into(),
        SchemaKind::Points => serde_json::from_value::<PointsDoc>(value)?.into(),
        SchemaKind::Curves => serde_json::from_value::<CurvesDoc>(value)?.into(),
        SchemaKind::PolyMesh => serde_json::from_value::<PolyMeshDoc>(value)?.into(),
        SchemaKind::NuPatch | SchemaKind::SubD | SchemaKind::Other => return Ok(None),
    };
    Ok(Some(sample))
}

impl From<PolyMeshDoc> for GeomSample {
    fn from(m: PolyMeshDoc) -> Self {
        GeomSample::PolyMesh(PolyMeshSample {
            positions: m.positions.into_iter().map(vec3_from_array).collect(),
            face_counts: m.face_counts,
            face_indices: m.face_indices,
            normals: m.normals.map(|n| n.into_iter().map(vec3_from_array).collect()),
            uvs: m.uvs.map(|uv| uv.into_iter().map(vec2_from_array).collect()),
        })
    }
}

impl From<CurvesDoc> for GeomSample {
    fn from(c: CurvesDoc) -> Self {
        GeomSample::Curves(CurvesSample {
            positions: c.positions.into_iter().map(vec3_from_array).collect(),
            num_vertices: c.num_vertices,
            wrap: if c.periodic {
                CurvePeriodicity::Periodic
            } else {
                CurvePeriodicity::NonPeriodic
            },
        })
    }
}

impl From<PointsDoc> for GeomSample {
    fn from(p: PointsDoc) -> Self {
        GeomSample::Points(PointsSample {
            positions: p.positions.into_iter().map(vec3_from_array).collect(),
            ids: p.ids,
        })
    }
}

impl From<XformDoc> for GeomSample {
    fn from(x: XformDoc) -> Self {
        GeomSample::Xform(XformSample {
            ops: x.ops.into_iter().map(XformOp::from).collect(),
            inherits: x.inherits,
        })
    }
}
