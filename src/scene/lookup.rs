//! Flattened name index over a scene graph.

use std::collections::HashMap;

use tracing::warn;

use super::graph::SceneGraph;
use super::node::{NodeId, SceneNode};

/// Geometry nodes by full name, in post-order of the hierarchy.
///
/// Transform, generic and root nodes are structural and never listed.
#[derive(Clone, Debug, Default)]
pub struct LookupTable {
    names: Vec<String>,
    ids: Vec<NodeId>,
    by_name: HashMap<String, usize>,
}

impl LookupTable {
    /// Flatten `graph` with a post-order walk.
    pub fn build(graph: &SceneGraph) -> Self {
        let mut table = Self::default();
        graph.visit_post_order(|id, node| table.visit(id, node));
        table
    }

    fn visit(&mut self, id: NodeId, node: &SceneNode) {
        if !node.kind().is_geometry() {
            return;
        }
        if self.by_name.contains_key(node.name()) {
            warn!(node = %node.name(), "duplicate node name, keeping first");
            return;
        }
        self.by_name.insert(node.name().to_string(), self.names.len());
        self.names.push(node.name().to_string());
        self.ids.push(id);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn id_at(&self, index: usize) -> Option<NodeId> {
        self.ids.get(index).copied()
    }

    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.position(name).and_then(|i| self.id_at(i))
    }

    /// Position of `name` in flattening order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.names.iter().map(String::as_str).zip(self.ids.iter().copied())
    }

    pub fn clear(&mut self) {
        self.names.clear();
        self.ids.clear();
        self.by_name.clear();
    }
}

/// Key accepted by name-indexed lookups: a flattening index or a full name.
pub trait NodeKey {
    fn resolve(&self, table: &LookupTable) -> Option<NodeId>;
}

impl NodeKey for usize {
    fn resolve(&self, table: &LookupTable) -> Option<NodeId> {
        table.id_at(*self)
    }
}

impl NodeKey for &str {
    fn resolve(&self, table: &LookupTable) -> Option<NodeId> {
        table.id_of(self)
    }
}

impl NodeKey for &String {
    fn resolve(&self, table: &LookupTable) -> Option<NodeId> {
        table.id_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentArchive;

    const DOC: &str = r#"{ "root": { "name": "ABC", "children": [
        { "name": "X", "schema": "AbcGeom_Xform_v3", "children": [
            { "name": "M", "schema": "AbcGeom_PolyMesh_v1" },
            { "name": "P", "schema": "AbcGeom_Points_v1" }
        ] },
        { "name": "C", "schema": "AbcGeom_Curve_v2" },
        { "name": "G" }
    ] } }"#;

    fn table() -> LookupTable {
        let archive = DocumentArchive::from_slice("t", DOC.as_bytes()).unwrap();
        LookupTable::build(&SceneGraph::build(&archive))
    }

    #[test]
    fn test_geometry_only_post_order() {
        let table = table();
        assert_eq!(table.names(), ["/X/M", "/X/P", "/C"]);
        assert_eq!(table.position("/C"), Some(2));
        assert!(table.id_of("/X").is_none());
        assert!(table.id_of("/G").is_none());
    }

    #[test]
    fn test_keys_agree() {
        let table = table();
        for (i, name) in table.names().iter().enumerate() {
            assert_eq!(i.resolve(&table), name.resolve(&table));
            assert_eq!(name.as_str().resolve(&table), table.id_at(i));
        }
        assert!(99usize.resolve(&table).is_none());
        assert!("/nope".resolve(&table).is_none());
    }
}
