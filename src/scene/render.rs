//! Rendering seam.
//!
//! The scene engine never issues draw calls itself; it hands evaluated
//! payloads to a [`Renderer`] supplied by the host application.

use super::payload::{CurveSet, Mesh, PointSet};

/// Draw-call sink for evaluated geometry.
pub trait Renderer {
    /// Host texture handle threaded through textured draws.
    type Texture: ?Sized;

    fn draw_points(&mut self, points: &PointSet);

    fn draw_polylines(&mut self, curves: &CurveSet);

    fn draw_mesh(&mut self, mesh: &Mesh);

    fn bind_texture(&mut self, texture: &Self::Texture);

    fn unbind_texture(&mut self, texture: &Self::Texture);

    /// Draw `mesh` with `texture` bound.
    fn draw_mesh_textured(&mut self, mesh: &Mesh, texture: &Self::Texture) {
        self.bind_texture(texture);
        self.draw_mesh(mesh);
        self.unbind_texture(texture);
    }
}

/// Renderer that only tallies what it was asked to draw.
///
/// Useful for headless runs and for reporting scene statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub point_sets: usize,
    pub points: usize,
    pub curve_sets: usize,
    pub polylines: usize,
    pub meshes: usize,
    pub triangles: usize,
    pub textured_meshes: usize,
    bound: usize,
}

impl Renderer for DrawStats {
    type Texture = ();

    fn draw_points(&mut self, points: &PointSet) {
        self.point_sets += 1;
        self.points += points.len();
    }

    fn draw_polylines(&mut self, curves: &CurveSet) {
        self.curve_sets += 1;
        self.polylines += curves.len();
    }

    fn draw_mesh(&mut self, mesh: &Mesh) {
        self.meshes += 1;
        self.triangles += mesh.num_triangles();
        if self.bound > 0 {
            self.textured_meshes += 1;
        }
    }

    fn bind_texture(&mut self, _texture: &()) {
        self.bound += 1;
    }

    fn unbind_texture(&mut self, _texture: &()) {
        self.bound = self.bound.saturating_sub(1);
    }
}
