//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use alembic_scene::scene::{CurveSet, Mesh, PointSet, Renderer};
use serde_json::Value;
use tempfile::TempDir;

/// Write `doc` as `name` into a fresh temp directory.
pub fn write_scene(name: &str, doc: &Value) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_vec_pretty(doc).expect("serialize")).expect("write scene");
    (dir, path)
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Points(usize),
    Polylines(usize),
    Mesh(usize),
    Bind(String),
    Unbind(String),
}

/// Renderer that records every call in order.
#[derive(Default)]
pub struct RecordingRenderer {
    pub calls: Vec<Call>,
}

impl Renderer for RecordingRenderer {
    type Texture = str;

    fn draw_points(&mut self, points: &PointSet) {
        self.calls.push(Call::Points(points.len()));
    }

    fn draw_polylines(&mut self, curves: &CurveSet) {
        self.calls.push(Call::Polylines(curves.len()));
    }

    fn draw_mesh(&mut self, mesh: &Mesh) {
        self.calls.push(Call::Mesh(mesh.num_triangles()));
    }

    fn bind_texture(&mut self, texture: &str) {
        self.calls.push(Call::Bind(texture.to_string()));
    }

    fn unbind_texture(&mut self, texture: &str) {
        self.calls.push(Call::Unbind(texture.to_string()));
    }
}
