//! Geometry schemas.
//!
//! This module provides typed schema readers for the geometry kinds the
//! scene engine evaluates:
//! - [`IXform`] - Transform nodes
//! - [`IPoints`] - Point clouds
//! - [`ICurves`] - Curves (read as polylines)
//! - [`IPolyMesh`] - Polygon meshes
//!
//! NURBS patches and subdivision surfaces are recognized by
//! [`SchemaKind::classify`] but have no reader.

use crate::core::ObjectHeader;

mod util;

pub mod curves;
pub mod points;
pub mod polymesh;
pub mod xform;

pub use curves::{CurvePeriodicity, CurvesSample, ICurves, CURVES_SCHEMA};
pub use points::{IPoints, PointsSample, POINTS_SCHEMA};
pub use polymesh::{IPolyMesh, PolyMeshSample, POLYMESH_SCHEMA};
pub use xform::{IXform, XformOp, XformOpType, XformSample, XFORM_SCHEMA};

/// NURBS patch schema identifier.
pub const NUPATCH_SCHEMA: &str = "AbcGeom_NuPatch_v2";

/// Subdivision surface schema identifier.
pub const SUBD_SCHEMA: &str = "AbcGeom_SubD_v1";

/// Schema kinds recognized in object headers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    PolyMesh,
    Points,
    Curves,
    NuPatch,
    Xform,
    SubD,
    /// Anything without a recognized geometry schema.
    Other,
}

impl SchemaKind {
    /// Match order used when classifying a header.
    const MATCH_ORDER: [(SchemaKind, &'static str); 6] = [
        (SchemaKind::PolyMesh, POLYMESH_SCHEMA),
        (SchemaKind::Points, POINTS_SCHEMA),
        (SchemaKind::Curves, CURVES_SCHEMA),
        (SchemaKind::NuPatch, NUPATCH_SCHEMA),
        (SchemaKind::Xform, XFORM_SCHEMA),
        (SchemaKind::SubD, SUBD_SCHEMA),
    ];

    /// Classify an object header by its schema metadata.
    pub fn classify(header: &ObjectHeader) -> Self {
        Self::MATCH_ORDER
            .iter()
            .find(|(_, title)| header.meta_data.matches_schema(title))
            .map(|(kind, _)| *kind)
            .unwrap_or(SchemaKind::Other)
    }

    /// Schema identifier for this kind, if any.
    pub fn schema(&self) -> Option<&'static str> {
        Self::MATCH_ORDER
            .iter()
            .find(|(kind, _)| kind == self)
            .map(|(_, title)| *title)
    }

    /// Recognized kinds that have no reader.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, SchemaKind::NuPatch | SchemaKind::SubD)
    }
}

/// One decoded schema sample, as handed out by an object reader.
#[derive(Clone, Debug)]
pub enum GeomSample {
    Xform(XformSample),
    Points(PointsSample),
    Curves(CurvesSample),
    PolyMesh(PolyMeshSample),
}

impl GeomSample {
    /// Schema kind this sample belongs to.
    pub fn kind(&self) -> SchemaKind {
        match self {
            GeomSample::Xform(_) => SchemaKind::Xform,
            GeomSample::Points(_) => SchemaKind::Points,
            GeomSample::Curves(_) => SchemaKind::Curves,
            GeomSample::PolyMesh(_) => SchemaKind::PolyMesh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MetaData;

    fn header_with_schema(schema: Option<&str>) -> ObjectHeader {
        let mut meta = MetaData::new();
        if let Some(s) = schema {
            meta.set_schema(s);
        }
        ObjectHeader::with_meta_data("obj", "/obj", meta)
    }

    #[test]
    fn test_classify() {
        let cases = [
            (Some(POLYMESH_SCHEMA), SchemaKind::PolyMesh),
            (Some(POINTS_SCHEMA), SchemaKind::Points),
            (Some(CURVES_SCHEMA), SchemaKind::Curves),
            (Some(XFORM_SCHEMA), SchemaKind::Xform),
            (Some(NUPATCH_SCHEMA), SchemaKind::NuPatch),
            (Some(SUBD_SCHEMA), SchemaKind::SubD),
            (Some("AbcGeom_Camera_v1"), SchemaKind::Other),
            (None, SchemaKind::Other),
        ];
        for (schema, expected) in cases {
            assert_eq!(SchemaKind::classify(&header_with_schema(schema)), expected);
        }
    }

    #[test]
    fn test_unsupported() {
        assert!(SchemaKind::SubD.is_unsupported());
        assert!(SchemaKind::NuPatch.is_unsupported());
        assert!(!SchemaKind::PolyMesh.is_unsupported());
        assert_eq!(SchemaKind::Other.schema(), None);
        assert_eq!(SchemaKind::Xform.schema(), Some(XFORM_SCHEMA));
    }
}
