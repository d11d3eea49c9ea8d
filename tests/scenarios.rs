//! End-to-end scene evaluation scenarios.

mod common;

use alembic_scene::prelude::*;
use alembic_scene::scene::NodeData;
use common::{write_scene, Call, RecordingRenderer};
use serde_json::json;

fn triangle_mesh() -> serde_json::Value {
    json!({
        "positions": [[0, 0, 0], [1, 0, 0], [0, 1, 0]],
        "face_counts": [3],
        "face_indices": [0, 1, 2]
    })
}

fn single_mesh_scene() -> serde_json::Value {
    json!({
        "root": { "name": "ABC", "children": [
            { "name": "A", "schema": "AbcGeom_Xform_v3", "children": [
                { "name": "Mesh", "schema": "AbcGeom_PolyMesh_v1", "samples": [ triangle_mesh() ] }
            ] }
        ] }
    })
}

fn animated_pair_scene() -> serde_json::Value {
    json!({
        "time_samplings": [ { "type": "uniform", "time_per_cycle": 1.0 } ],
        "root": { "name": "ABC", "children": [
            { "name": "Rig", "schema": "AbcGeom_Xform_v3", "time_sampling": 1,
              "samples": [
                  { "ops": [ { "translate": [0, 0, 0] } ] },
                  { "ops": [ { "translate": [1, 0, 0] } ] },
                  { "ops": [ { "translate": [2, 0, 0] } ] }
              ],
              "children": [
                { "name": "Left", "schema": "AbcGeom_Points_v1",
                  "samples": [ { "positions": [[-1, 0, 0]], "ids": [1] } ] },
                { "name": "Right", "schema": "AbcGeom_Points_v1",
                  "samples": [ { "positions": [[1, 0, 0], [1, 1, 0]], "ids": [2, 3] } ] }
              ] }
        ] }
    })
}

#[test]
fn single_constant_mesh() {
    let (_dir, path) = write_scene("mesh.json", &single_mesh_scene());
    let mut session = Session::new();
    session.open(&path).unwrap();
    session.set_time(0.0);

    assert_eq!(session.len(), 1);
    assert_eq!(session.names(), ["/A/Mesh"]);
    assert_eq!(session.min_time(), 0.0);
    assert_eq!(session.max_time(), 0.0);

    let mesh = session.mesh("/A/Mesh").expect("mesh extraction");
    assert_eq!(mesh.num_triangles(), 1);
    assert!(session.points("/A/Mesh").is_none());
    assert!(session.polylines("/A/Mesh").is_none());
}

#[test]
fn animated_transform_drives_siblings() {
    let (_dir, path) = write_scene("pair.json", &animated_pair_scene());
    let mut session = Session::new();
    session.open(&path).unwrap();

    assert_eq!(session.min_time(), 0.0);
    assert_eq!(session.max_time(), 2.0);
    assert_eq!(session.names(), ["/Rig/Left", "/Rig/Right"]);

    session.set_time(1.0);
    assert_eq!(session.time(), Some(1.0));
    assert_eq!(session.points("/Rig/Left").unwrap(), vec![Vec3::new(0.0, 0.0, 0.0)]);
    assert_eq!(
        session.points("/Rig/Right").unwrap(),
        vec![Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 0.0)]
    );

    // nearest sample, no interpolation
    session.set_time(1.4);
    assert_eq!(session.points(0usize).unwrap(), vec![Vec3::new(0.0, 0.0, 0.0)]);
    session.set_time(1.6);
    assert_eq!(session.points(0usize).unwrap(), vec![Vec3::new(1.0, 0.0, 0.0)]);
}

#[test]
fn sibling_payloads_are_independent() {
    let (_dir, path) = write_scene("pair.json", &animated_pair_scene());
    let mut session = Session::new();
    session.open(&path).unwrap();
    session.set_time(2.0);

    let mut left = session.point_list("/Rig/Left").unwrap();
    left[0].position = Vec3::splat(100.0);
    left.push(Point::anonymous(Vec3::ZERO));

    let right = session.point_list("/Rig/Right").unwrap();
    assert_eq!(right.len(), 2);
    assert_eq!(right[0], Point::new(2, Vec3::new(3.0, 0.0, 0.0)));
    assert_eq!(session.point_list("/Rig/Left").unwrap(), vec![Point::new(1, Vec3::new(1.0, 0.0, 0.0))]);
}

#[test]
fn names_resolve_to_indexed_nodes() {
    let (_dir, path) = write_scene("pair.json", &animated_pair_scene());
    let mut session = Session::new();
    session.open(&path).unwrap();

    assert_eq!(session.names().len(), session.len());
    for (i, name) in session.names().iter().enumerate() {
        let by_name = session.get(name).unwrap();
        let by_index = session.get(i).unwrap();
        assert!(std::ptr::eq(by_name, by_index));
        assert_eq!(by_name.name(), name.as_str());
    }
    assert!(session.get(session.len()).is_none());
    assert!(session.get("/Rig").is_none());
}

#[test]
fn kind_mismatch_leaves_nothing() {
    let (_dir, path) = write_scene("pair.json", &animated_pair_scene());
    let mut session = Session::new();
    session.open(&path).unwrap();
    session.set_time(0.0);

    assert!(session.mesh("/Rig/Left").is_none());
    let node = session.get("/Rig/Left").unwrap();
    assert!(matches!(node.as_mesh(), Err(Error::KindMismatch { .. })));
    assert!(node.is_type_of(NodeKind::Points));
    assert_eq!(node.type_name(), "Points");
}

#[test]
fn set_time_is_deterministic() {
    let (_dir, path) = write_scene("pair.json", &animated_pair_scene());
    let mut session = Session::new();
    session.open(&path).unwrap();

    session.set_time(1.0);
    let first: Vec<_> = (0..session.len()).map(|i| session.point_list(i).unwrap()).collect();
    session.set_time(1.0);
    let second: Vec<_> = (0..session.len()).map(|i| session.point_list(i).unwrap()).collect();

    let bits = |sets: &[Vec<Point>]| -> Vec<u32> {
        sets.iter()
            .flatten()
            .flat_map(|p| p.position.to_array().map(f32::to_bits))
            .collect()
    };
    assert_eq!(bits(first.as_slice()), bits(second.as_slice()));
}

#[test]
fn global_range_spans_animated_nodes() {
    let scene = json!({
        "time_samplings": [
            { "type": "uniform", "time_per_cycle": 0.5, "start_time": 1.0 },
            { "type": "acyclic", "times": [0.25, 3.0] }
        ],
        "root": { "name": "ABC", "children": [
            { "name": "X", "schema": "AbcGeom_Xform_v3", "time_sampling": 1,
              "samples": [ { "ops": [] }, { "ops": [] }, { "ops": [] } ],
              "children": [
                { "name": "C", "schema": "AbcGeom_Curve_v2", "time_sampling": 2,
                  "samples": [
                      { "positions": [[0, 0, 0], [1, 0, 0]], "num_vertices": [2] },
                      { "positions": [[0, 0, 0], [2, 0, 0]], "num_vertices": [2] }
                  ] }
              ] },
            { "name": "M", "schema": "AbcGeom_PolyMesh_v1", "time_sampling": 1,
              "samples": [ triangle_mesh() ] }
        ] }
    });
    let (_dir, path) = write_scene("range.json", &scene);
    let mut session = Session::new();
    session.open(&path).unwrap();

    // X spans [1, 2], C spans [0.25, 3]; M has one sample and is constant
    assert_eq!(session.min_time(), 0.25);
    assert_eq!(session.max_time(), 3.0);
    assert!(session.min_time() <= session.max_time());

    let graph = session.graph().unwrap();
    let x = graph.node(graph.node(graph.root()).unwrap().children()[0]).unwrap();
    assert_eq!(x.time_range().bounds(), (0.25, 3.0));
}

#[test]
fn draw_order_and_texture_threading() {
    let scene = json!({
        "root": { "name": "ABC", "children": [
            { "name": "M", "schema": "AbcGeom_PolyMesh_v1", "samples": [ triangle_mesh() ],
              "children": [
                { "name": "P", "schema": "AbcGeom_Points_v1", "samples": [ { "positions": [[0, 0, 0]] } ] }
              ] },
            { "name": "C", "schema": "AbcGeom_Curve_v2",
              "samples": [ { "positions": [[0, 0, 0], [1, 0, 0]], "num_vertices": [2] } ] }
        ] }
    });
    let (_dir, path) = write_scene("draw.json", &scene);
    let mut session = Session::new();
    session.open(&path).unwrap();
    session.set_time(0.0);

    let mut renderer = RecordingRenderer::default();
    session.draw(&mut renderer);
    assert_eq!(renderer.calls, vec![Call::Mesh(1), Call::Points(1), Call::Polylines(1)]);

    let mut renderer = RecordingRenderer::default();
    session.draw_textured(&mut renderer, "cursor.png");
    assert_eq!(
        renderer.calls,
        vec![
            Call::Bind("cursor.png".into()),
            Call::Mesh(1),
            Call::Unbind("cursor.png".into()),
            Call::Points(1),
            Call::Polylines(1),
        ]
    );

    // lookup order is post-order: the mesh's child comes first
    assert_eq!(session.names(), ["/M/P", "/M", "/C"]);
}

#[test]
fn geometry_nodes_pass_transform_through() {
    let scene = json!({
        "root": { "name": "ABC", "children": [
            { "name": "X", "schema": "AbcGeom_Xform_v3",
              "samples": [ { "ops": [ { "scale": [2, 2, 2] } ] } ],
              "children": [
                { "name": "M", "schema": "AbcGeom_PolyMesh_v1", "samples": [ triangle_mesh() ],
                  "children": [
                    { "name": "P", "schema": "AbcGeom_Points_v1", "samples": [ { "positions": [[1, 1, 1]] } ] }
                  ] }
              ] }
        ] }
    });
    let (_dir, path) = write_scene("pass.json", &scene);
    let mut session = Session::new();
    session.open(&path).unwrap();
    session.set_time(0.0);

    assert_eq!(session.points("/X/M/P").unwrap(), vec![Vec3::splat(2.0)]);
    let mesh = session.mesh("/X/M").unwrap();
    assert_eq!(mesh.positions[1], Vec3::new(2.0, 0.0, 0.0));
    assert_eq!(session.get("/X/M").unwrap().world_transform(), Mat4::from_scale(Vec3::splat(2.0)));
}

#[test]
fn nested_transforms_compose_parent_first() {
    let scene = json!({
        "root": { "name": "ABC", "children": [
            { "name": "Spin", "schema": "AbcGeom_Xform_v3",
              "samples": [ { "ops": [ { "rotate_z": 90 } ] } ],
              "children": [
                { "name": "Arm", "schema": "AbcGeom_Xform_v3",
                  "samples": [ { "ops": [ { "translate": [1, 0, 0] } ] } ],
                  "children": [
                    { "name": "Tip", "schema": "AbcGeom_Points_v1", "samples": [ { "positions": [[0, 0, 0]] } ] }
                  ] }
              ] }
        ] }
    });
    let (_dir, path) = write_scene("nested.json", &scene);
    let mut session = Session::new();
    session.open(&path).unwrap();
    session.set_time(0.0);

    let tip = session.points("/Spin/Arm/Tip").unwrap();
    assert_eq!(tip.len(), 1);
    assert!(tip[0].abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-5), "tip at {:?}", tip[0]);
}

#[test]
fn invalid_objects_are_discarded() {
    let scene = json!({
        "root": { "name": "ABC", "children": [
            { "name": "Bad", "schema": "AbcGeom_Points_v1", "samples": [ { "ops": [] } ],
              "children": [
                { "name": "Hidden", "schema": "AbcGeom_Points_v1", "samples": [ { "positions": [[0, 0, 0]] } ] }
              ] },
            { "name": "Good", "schema": "AbcGeom_Points_v1", "samples": [ { "positions": [[0, 0, 0]] } ] }
        ] }
    });
    let (_dir, path) = write_scene("invalid.json", &scene);
    let mut session = Session::new();
    session.open(&path).unwrap();

    assert_eq!(session.names(), ["/Good"]);
}

#[test]
fn duplicate_names_keep_first() {
    let scene = json!({
        "root": { "name": "ABC", "children": [
            { "name": "P", "schema": "AbcGeom_Points_v1", "samples": [ { "positions": [[1, 0, 0]] } ] },
            { "name": "P", "schema": "AbcGeom_Points_v1", "samples": [ { "positions": [[2, 0, 0]] } ] }
        ] }
    });
    let (_dir, path) = write_scene("dup.json", &scene);
    let mut session = Session::new();
    session.open(&path).unwrap();
    session.set_time(0.0);

    assert_eq!(session.len(), 1);
    assert_eq!(session.points("/P").unwrap(), vec![Vec3::X]);
}

#[test]
fn transform_node_keeps_local_matrix() {
    let (_dir, path) = write_scene("pair.json", &animated_pair_scene());
    let mut session = Session::new();
    session.open(&path).unwrap();
    session.set_time(2.0);

    let graph = session.graph().unwrap();
    let rig = graph.node(graph.node(graph.root()).unwrap().children()[0]).unwrap();
    match rig.data() {
        NodeData::Transform { local } => {
            assert_eq!(*local, Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)));
        }
        other => panic!("unexpected node data {other:?}"),
    }
}

#[test]
fn playback_wraps_against_max_time() {
    let (_dir, path) = write_scene("pair.json", &animated_pair_scene());
    let mut session = Session::new();
    session.open(&path).unwrap();

    let mut clock = Playback::new(1.0, true);
    assert_eq!(clock.tick(&mut session, 1.0), 1.0);
    assert_eq!(clock.tick(&mut session, 1.5), 0.5);
    assert_eq!(session.time(), Some(0.5));
}

#[test]
#[should_panic(expected = "not supported")]
fn subdivision_surface_is_fatal() {
    let scene = json!({
        "root": { "name": "ABC", "children": [
            { "name": "Surface", "schema": "AbcGeom_SubD_v1" }
        ] }
    });
    let (_dir, path) = write_scene("subd.json", &scene);
    let mut session = Session::new();
    let _ = session.open(&path);
}

#[test]
#[should_panic(expected = "not supported")]
fn nurbs_patch_is_fatal() {
    let scene = json!({
        "root": { "name": "ABC", "children": [
            { "name": "Patch", "schema": "AbcGeom_NuPatch_v2" }
        ] }
    });
    let (_dir, path) = write_scene("nurbs.json", &scene);
    let mut session = Session::new();
    let _ = session.open(&path);
}
