//! Top-level archive session.

use std::path::Path;

use tracing::{debug, info, instrument};

use super::graph::SceneGraph;
use super::lookup::{LookupTable, NodeKey};
use super::node::SceneNode;
use super::payload::{CurveSet, Mesh, Point, PointSet, PolyMeshSet, Polyline};
use super::render::Renderer;
use crate::config::Settings;
use crate::core::ArchiveReader;
use crate::document::DocumentArchive;
use crate::util::{Chrono, Error, Result, Vec3};

/// Open archive together with its evaluated scene.
struct Loaded {
    archive: Box<dyn ArchiveReader>,
    graph: SceneGraph,
}

/// Reader session over one archive at a time.
///
/// ```no_run
/// use alembic_scene::scene::{DrawStats, Session};
///
/// let mut session = Session::new();
/// session.open("scene.json")?;
/// session.set_time(session.max_time() * 0.5);
///
/// let mut stats = DrawStats::default();
/// session.draw(&mut stats);
/// # Ok::<(), alembic_scene::Error>(())
/// ```
pub struct Session {
    settings: Settings,
    loaded: Option<Loaded>,
    lookup: LookupTable,
    current_time: Option<Chrono>,
    min_time: Chrono,
    max_time: Chrono,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            loaded: None,
            lookup: LookupTable::default(),
            current_time: None,
            min_time: 0.0,
            max_time: 0.0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Open the scene document at `path`, replacing any open archive.
    ///
    /// Relative paths are resolved against the configured data root. On
    /// failure the session is left closed.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.close();
        let resolved = self.settings.data_path(path);
        let archive = DocumentArchive::open(&resolved)?;
        self.open_archive(Box::new(archive))
    }

    /// Adopt an already opened archive, replacing any open archive.
    pub fn open_archive(&mut self, archive: Box<dyn ArchiveReader>) -> Result<()> {
        self.close();
        if !archive.valid() {
            return Err(Error::invalid(format!("archive {} is not valid", archive.name())));
        }

        let graph = SceneGraph::build(archive.as_ref());
        let lookup = LookupTable::build(&graph);
        let (min_time, max_time) = graph.time_range().bounds();

        info!(
            archive = %archive.name(),
            nodes = graph.len(),
            geometry = lookup.len(),
            min_time,
            max_time,
            "archive opened"
        );

        self.lookup = lookup;
        self.min_time = min_time;
        self.max_time = max_time;
        self.current_time = None;
        self.loaded = Some(Loaded { archive, graph });

        if self.settings.dump_on_open {
            self.dump_names();
        }
        Ok(())
    }

    /// Release the archive and its scene; does nothing when closed.
    pub fn close(&mut self) {
        let Some(loaded) = self.loaded.take() else {
            return;
        };
        info!(archive = %loaded.archive.name(), "archive closed");
        self.lookup.clear();
        self.current_time = None;
        self.min_time = 0.0;
        self.max_time = 0.0;
    }

    pub fn is_open(&self) -> bool {
        self.loaded.is_some()
    }

    /// Name of the open archive.
    pub fn archive_name(&self) -> Option<&str> {
        self.loaded.as_ref().map(|l| l.archive.name())
    }

    pub fn archive(&self) -> Option<&dyn ArchiveReader> {
        self.loaded.as_ref().map(|l| l.archive.as_ref())
    }

    pub fn graph(&self) -> Option<&SceneGraph> {
        self.loaded.as_ref().map(|l| &l.graph)
    }

    /// Evaluate the whole scene at `time`; does nothing when closed.
    ///
    /// `time` is used as given; callers wrap or clamp it against
    /// [`min_time`](Self::min_time) and [`max_time`](Self::max_time).
    #[instrument(level = "debug", skip(self))]
    pub fn set_time(&mut self, time: Chrono) {
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        loaded.graph.update(time);
        self.current_time = Some(time);
        debug!(time, "scene evaluated");
    }

    /// Time of the last evaluation, if any since open.
    pub fn time(&self) -> Option<Chrono> {
        self.current_time
    }

    pub fn min_time(&self) -> Chrono {
        self.min_time
    }

    pub fn max_time(&self) -> Chrono {
        self.max_time
    }

    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        if let Some(loaded) = &self.loaded {
            loaded.graph.draw(renderer);
        }
    }

    pub fn draw_textured<R: Renderer + ?Sized>(&self, renderer: &mut R, texture: &R::Texture) {
        if let Some(loaded) = &self.loaded {
            loaded.graph.draw_textured(renderer, texture);
        }
    }

    /// Number of named geometry nodes.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Names in flattening order.
    pub fn names(&self) -> &[String] {
        self.lookup.names()
    }

    /// Node by flattening index or full name.
    pub fn get<K: NodeKey>(&self, key: K) -> Option<&SceneNode> {
        let graph = self.graph()?;
        key.resolve(&self.lookup).and_then(|id| graph.node(id))
    }

    /// Like [`get`](Self::get), with a miss reported as an error.
    pub fn node<K: NodeKey + std::fmt::Debug>(&self, key: K) -> Result<&SceneNode> {
        if !self.is_open() {
            return Err(Error::NotOpen);
        }
        let missing = format!("{key:?}");
        self.get(key).ok_or(Error::NodeNotFound(missing))
    }

    pub fn mesh<K: NodeKey>(&self, key: K) -> Option<Mesh> {
        self.get(key)?.as_mesh().ok()
    }

    pub fn polylines<K: NodeKey>(&self, key: K) -> Option<Vec<Polyline>> {
        self.get(key)?.as_polylines().ok()
    }

    pub fn points<K: NodeKey>(&self, key: K) -> Option<Vec<Vec3>> {
        self.get(key)?.as_points().ok()
    }

    /// Points with their ids.
    pub fn point_list<K: NodeKey>(&self, key: K) -> Option<Vec<Point>> {
        self.point_set(key).map(|set| set.points().to_vec())
    }

    pub fn point_set<K: NodeKey>(&self, key: K) -> Option<&PointSet> {
        self.get(key)?.as_point_set().ok()
    }

    pub fn curve_set<K: NodeKey>(&self, key: K) -> Option<&CurveSet> {
        self.get(key)?.as_curve_set().ok()
    }

    pub fn poly_mesh<K: NodeKey>(&self, key: K) -> Option<&PolyMeshSet> {
        self.get(key)?.as_poly_mesh().ok()
    }

    /// Named nodes in flattening order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &SceneNode)> + '_ {
        let graph = self.graph();
        self.lookup
            .iter()
            .filter_map(move |(name, id)| Some((name, graph?.node(id)?)))
    }

    /// Log `index: Kind 'name'` for every named node.
    pub fn dump_names(&self) {
        for (i, (name, node)) in self.entries().enumerate() {
            info!("{}: {} '{}'", i, node.type_name(), name);
        }
        debug!(count = self.len(), "names dumped");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
