//! # Alembic Scene
//!
//! Time-sampled scene graph reader for Alembic-style archives.
//!
//! An archive is a hierarchy of objects, each carrying a geometry schema
//! (transform, points, curves, polygon mesh) sampled over time. This crate
//! opens an archive, builds a typed node tree from it, evaluates transforms
//! and geometry at any query time, and hands back world-space meshes, point
//! clouds and polylines by name.
//!
//! ## Modules
//!
//! - [`util`] - Errors, math types and conversions
//! - [`core`] - Archive access interface (time sampling, headers, reader traits)
//! - [`geom`] - Geometry schemas (Xform, Points, Curves, PolyMesh)
//! - [`document`] - JSON scene document archive backend
//! - [`scene`] - Scene graph, evaluation, lookup table and session
//! - [`config`] - Persistent settings
//!
//! ## Example
//!
//! ```no_run
//! use alembic_scene::prelude::*;
//!
//! let mut session = Session::new();
//! session.open("animation.json")?;
//! session.set_time(1.0);
//!
//! for name in session.names() {
//!     if let Some(mesh) = session.mesh(name) {
//!         println!("{name}: {} triangles", mesh.num_triangles());
//!     }
//! }
//! # Ok::<(), alembic_scene::Error>(())
//! ```

pub mod util;
pub mod core;
pub mod geom;
pub mod document;
pub mod scene;
pub mod config;

// Re-export commonly used types
pub use util::{Error, Result};
pub use scene::Session;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result, Mat4, Vec2, Vec3};
    pub use crate::core::{ArchiveReader, ObjectReader, TimeSampling, SampleSelector};
    pub use crate::document::DocumentArchive;
    pub use crate::scene::{
        Mesh, NodeKind, Playback, Point, Polyline, Renderer, SceneNode, Session,
    };
    pub use crate::config::Settings;
}
