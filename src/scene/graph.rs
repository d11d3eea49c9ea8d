//! Arena-backed scene hierarchy.

use tracing::{debug, error, warn};

use super::node::{own_time_range, NodeData, NodeId, SceneNode, TimeRange};
use super::render::Renderer;
use crate::core::{ArchiveReader, ObjectReader};
use crate::geom::SchemaKind;
use crate::util::{Chrono, Mat4};

/// Scene hierarchy built from one archive.
///
/// Nodes live in a flat arena; each node lists the ids of the children it
/// owns in archive order. Children are stored before their parent, so the
/// root is always the last node.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    root: NodeId,
}

impl SceneGraph {
    /// Build the node tree for every valid object below the archive root.
    ///
    /// # Panics
    ///
    /// Panics when the hierarchy contains a NURBS patch or subdivision
    /// surface; those schemas have no evaluator.
    pub fn build(archive: &dyn ArchiveReader) -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        graph.root = graph.build_node(archive.root(), NodeData::Root, SchemaKind::Other);
        debug!(nodes = graph.nodes.len(), "scene graph built");
        graph
    }

    fn build_node(
        &mut self,
        object: Box<dyn ObjectReader>,
        data: NodeData,
        kind: SchemaKind,
    ) -> NodeId {
        let mut range = own_time_range(kind, object.as_ref());
        let mut children = Vec::with_capacity(object.num_children());

        for i in 0..object.num_children() {
            let Some(header) = object.child_header(i) else {
                continue;
            };
            let child_kind = SchemaKind::classify(header);
            if child_kind.is_unsupported() {
                error!(object = %header.full_name, "{:?} not implemented", child_kind);
                unimplemented!(
                    "{} ({}) is not supported",
                    header.full_name,
                    header.schema().unwrap_or_default()
                );
            }

            let Some(child) = object.child(i) else {
                warn!(parent = %object.full_name(), index = i, "child object missing");
                continue;
            };
            if !child.valid() {
                warn!(object = %child.full_name(), "discarding invalid object");
                continue;
            }

            let id = self.build_node(child, NodeData::for_schema(child_kind), child_kind);
            range = range.union(&self.nodes[id.0].time_range);
            children.push(id);
        }

        let mut node = SceneNode::new(object, data);
        node.time_range = range;
        node.children = children;
        debug!(node = %node.name, kind = ?node.kind(), "node constructed");

        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Union of every node's animated range.
    pub fn time_range(&self) -> TimeRange {
        self.node(self.root)
            .map(SceneNode::time_range)
            .unwrap_or_default()
    }

    /// Evaluate every node at `time`, starting from the identity transform.
    pub fn update(&mut self, time: Chrono) {
        self.update_node(self.root, time, Mat4::IDENTITY);
    }

    fn update_node(&mut self, id: NodeId, time: Chrono, inherited: Mat4) {
        let passed = self.nodes[id.0].evaluate(time, &inherited);
        for i in 0..self.nodes[id.0].children.len() {
            let child = self.nodes[id.0].children[i];
            self.update_node(child, time, passed);
        }
    }

    /// Draw every node's payload, parents before children.
    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        self.draw_node(self.root, renderer);
    }

    fn draw_node<R: Renderer + ?Sized>(&self, id: NodeId, renderer: &mut R) {
        let node = &self.nodes[id.0];
        node.draw(renderer);
        for &child in &node.children {
            self.draw_node(child, renderer);
        }
    }

    /// Draw every node's payload with `texture` bound for meshes.
    pub fn draw_textured<R: Renderer + ?Sized>(&self, renderer: &mut R, texture: &R::Texture) {
        self.draw_node_textured(self.root, renderer, texture);
    }

    fn draw_node_textured<R: Renderer + ?Sized>(
        &self,
        id: NodeId,
        renderer: &mut R,
        texture: &R::Texture,
    ) {
        let node = &self.nodes[id.0];
        node.draw_textured(renderer, texture);
        for &child in &node.children {
            self.draw_node_textured(child, renderer, texture);
        }
    }

    /// Visit every node, children before their parent.
    pub fn visit_post_order<F: FnMut(NodeId, &SceneNode)>(&self, mut visit: F) {
        self.visit_node(self.root, &mut visit);
    }

    fn visit_node<F: FnMut(NodeId, &SceneNode)>(&self, id: NodeId, visit: &mut F) {
        let node = &self.nodes[id.0];
        for &child in &node.children {
            self.visit_node(child, visit);
        }
        visit(id, node);
    }

    /// Visit every node with its depth, parents before children.
    pub fn visit_pre_order<F: FnMut(usize, NodeId, &SceneNode)>(&self, mut visit: F) {
        let mut stack = vec![(0usize, self.root)];
        while let Some((depth, id)) = stack.pop() {
            let node = &self.nodes[id.0];
            visit(depth, id, node);
            stack.extend(node.children.iter().rev().map(|&c| (depth + 1, c)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentArchive;
    use crate::scene::{DrawStats, NodeKind};
    use crate::util::Vec3;

    fn archive(json: &str) -> DocumentArchive {
        DocumentArchive::from_slice("test", json.as_bytes()).unwrap()
    }

    const NESTED: &str = r#"{
        "time_samplings": [ { "type": "uniform", "time_per_cycle": 1.0, "start_time": 1.0 } ],
        "root": { "name": "ABC", "children": [
            { "name": "A", "schema": "AbcGeom_Xform_v3",
              "samples": [ { "ops": [ { "translate": [0, 0, 5] } ] } ],
              "children": [
                { "name": "B", "schema": "AbcGeom_Xform_v3",
                  "samples": [ { "ops": [ { "translate": [1, 0, 0] } ], "inherits": false } ],
                  "children": [
                    { "name": "P", "schema": "AbcGeom_Points_v1", "time_sampling": 1,
                      "samples": [ { "positions": [[0, 0, 0]] }, { "positions": [[0, 1, 0]] } ] }
                  ] },
                { "name": "G",
                  "children": [
                    { "name": "C", "schema": "AbcGeom_Curve_v2",
                      "samples": [ { "positions": [[0,0,0],[1,0,0]], "num_vertices": [2] } ] }
                  ] }
              ] }
        ] }
    }"#;

    #[test]
    fn test_build_order_and_ranges() {
        let graph = SceneGraph::build(&archive(NESTED));
        assert_eq!(graph.len(), 6);
        assert_eq!(graph.root().index(), graph.len() - 1);

        let mut names = Vec::new();
        graph.visit_post_order(|_, node| names.push(node.name().to_string()));
        assert_eq!(names, ["/A/B/P", "/A/B", "/A/G/C", "/A/G", "/A", "/"]);

        assert_eq!(graph.time_range().bounds(), (1.0, 2.0));
    }

    #[test]
    fn test_pre_order_depths() {
        let graph = SceneGraph::build(&archive(NESTED));
        let mut seen = Vec::new();
        graph.visit_pre_order(|depth, _, node| seen.push((depth, node.kind())));
        assert_eq!(seen[0], (0, NodeKind::Unknown));
        assert_eq!(seen[1], (1, NodeKind::Transform));
        assert_eq!(seen[3], (3, NodeKind::Points));
        assert_eq!(seen[4], (2, NodeKind::Generic));
    }

    #[test]
    fn test_update_respects_inherits() {
        let mut graph = SceneGraph::build(&archive(NESTED));
        graph.update(2.0);

        let mut points = None;
        let mut curves = None;
        graph.visit_post_order(|_, node| match node.kind() {
            NodeKind::Points => points = node.as_points().ok(),
            NodeKind::Curves => curves = node.as_polylines().ok(),
            _ => {}
        });

        // B does not inherit A's translation
        assert_eq!(points.unwrap(), vec![Vec3::new(1.0, 1.0, 0.0)]);
        // generic nodes pass the transform through unchanged
        assert_eq!(curves.unwrap()[0].points[1], Vec3::new(1.0, 0.0, 5.0));
    }

    #[test]
    fn test_draw_visits_geometry() {
        let mut graph = SceneGraph::build(&archive(NESTED));
        graph.update(1.0);

        let mut stats = DrawStats::default();
        graph.draw(&mut stats);
        assert_eq!(stats.point_sets, 1);
        assert_eq!(stats.curve_sets, 1);
        assert_eq!(stats.meshes, 0);
    }

    #[test]
    #[should_panic(expected = "not supported")]
    fn test_subd_is_fatal() {
        let json = r#"{ "root": { "name": "ABC", "children": [
            { "name": "S", "schema": "AbcGeom_SubD_v1" } ] } }"#;
        SceneGraph::build(&archive(json));
    }
}
