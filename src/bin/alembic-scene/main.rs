//! alembic-scene CLI - inspect and play back scene archives.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use alembic_scene::config::Settings;
use alembic_scene::core::TimeSamplingType;
use alembic_scene::scene::{DrawStats, NodeKind, Playback, SceneNode, Session};
use alembic_scene::util::BBox3f;

#[derive(Parser)]
#[command(name = "alembic-scene", version, about = "Time-sampled scene archive inspection")]
struct Cli {
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory relative archive paths are resolved against
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List geometry nodes in lookup order
    Names { path: PathBuf },
    /// Show the node hierarchy
    Tree { path: PathBuf },
    /// Archive summary: metadata, time samplings, time range
    Info { path: PathBuf },
    /// Evaluate the scene at one time and report each geometry node
    Sample {
        path: PathBuf,
        /// Query time in seconds
        #[arg(short, long, default_value_t = 0.0)]
        time: f64,
        /// Restrict output to one node (full name or lookup index)
        #[arg(short, long)]
        node: Option<String>,
    },
    /// Run the playback loop headless and report per-frame draw counts
    Play {
        path: PathBuf,
        /// Number of frames to simulate
        #[arg(short, long, default_value_t = 24)]
        frames: u32,
        /// Frame rate of the simulated loop
        #[arg(long, default_value_t = 24.0)]
        fps: f64,
        /// Playback speed (overrides settings)
        #[arg(long)]
        speed: Option<f64>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = match (quiet, verbose) {
        (true, _) => EnvFilter::new("error"),
        (false, 0) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        (false, 1) => EnvFilter::new("debug"),
        (false, _) => EnvFilter::new("trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    if let Some(root) = cli.data_root {
        settings.data_root = Some(root);
    }

    match cli.command {
        Commands::Names { path } => cmd_names(open(settings, &path)?),
        Commands::Tree { path } => cmd_tree(open(settings, &path)?),
        Commands::Info { path } => cmd_info(open(settings, &path)?),
        Commands::Sample { path, time, node } => cmd_sample(open(settings, &path)?, time, node),
        Commands::Play { path, frames, fps, speed } => {
            let mut playback = Playback::from_settings(&settings);
            if let Some(speed) = speed {
                playback = Playback::new(speed, settings.loop_playback);
            }
            cmd_play(open(settings, &path)?, playback, frames, fps)
        }
    }
}

fn open(settings: Settings, path: &Path) -> anyhow::Result<Session> {
    let mut session = Session::with_settings(settings);
    session
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    Ok(session)
}

fn cmd_names(session: Session) -> anyhow::Result<()> {
    for (i, (name, node)) in session.entries().enumerate() {
        println!("{}: {} '{}'", i, node.type_name(), name);
    }
    Ok(())
}

fn cmd_tree(session: Session) -> anyhow::Result<()> {
    let Some(graph) = session.graph() else {
        bail!("no archive open");
    };
    println!("Archive: {}", session.archive_name().unwrap_or_default());
    println!();

    graph.visit_pre_order(|depth, _, node| {
        let indent = "  ".repeat(depth);
        let kind = match node.kind() {
            NodeKind::Unknown => "Root",
            kind => {
                let name = kind.type_name();
                if name.is_empty() { "Object" } else { name }
            }
        };
        let range = node.time_range();
        if range.is_empty() {
            println!("{indent}{} [{kind}]", node.name());
        } else {
            println!("{indent}{} [{kind}] {:.3}..{:.3}", node.name(), range.min(), range.max());
        }
    });
    Ok(())
}

fn cmd_info(session: Session) -> anyhow::Result<()> {
    let Some(archive) = session.archive() else {
        bail!("no archive open");
    };
    println!("Archive: {}", archive.name());

    let metadata = archive.archive_metadata();
    if !metadata.is_empty() {
        println!();
        println!("Metadata:");
        for (key, value) in metadata.iter() {
            println!("  {key} = {value}");
        }
    }

    println!();
    println!("Time Samplings ({}):", archive.num_time_samplings());
    for i in 0..archive.num_time_samplings() {
        let Some(ts) = archive.time_sampling(i) else {
            continue;
        };
        let desc = match &ts.sampling_type {
            TimeSamplingType::Identity => "Identity".to_string(),
            TimeSamplingType::Uniform { time_per_cycle, start_time } => format!(
                "Uniform ({:.2} fps, start {start_time})",
                1.0 / time_per_cycle
            ),
            TimeSamplingType::Cyclic { time_per_cycle, times } => {
                format!("Cyclic ({} samples per {time_per_cycle}s)", times.len())
            }
            TimeSamplingType::Acyclic { times } => format!("Acyclic ({} samples)", times.len()),
        };
        println!("  [{i}] {desc}");
    }

    let nodes = session.graph().map_or(0, |g| g.len());
    println!();
    println!("Nodes:          {nodes}");
    println!("Geometry nodes: {}", session.len());
    println!("Time range:     {:.3} .. {:.3}", session.min_time(), session.max_time());
    Ok(())
}

fn cmd_sample(mut session: Session, time: f64, node: Option<String>) -> anyhow::Result<()> {
    session.set_time(time);
    println!("t = {time}");

    match node {
        Some(key) => {
            let found = match key.parse::<usize>() {
                Ok(index) => session.get(index),
                Err(_) => session.get(key.as_str()),
            };
            let Some(node) = found else {
                bail!("no geometry node '{key}'");
            };
            print_node(node);
        }
        None => {
            let mut scene = BBox3f::EMPTY;
            for (_, node) in session.entries() {
                if let Some(bounds) = print_node(node) {
                    scene.expand_by_box(&bounds);
                }
            }
            if !scene.is_empty() {
                let (c, s) = (scene.center(), scene.size());
                println!(
                    "scene bounds center ({:.3}, {:.3}, {:.3}) size ({:.3}, {:.3}, {:.3})",
                    c.x, c.y, c.z, s.x, s.y, s.z
                );
            }
        }
    }
    Ok(())
}

/// Print one geometry node and return its world bounds.
fn print_node(node: &SceneNode) -> Option<BBox3f> {
    let (summary, bounds) = match node.kind() {
        NodeKind::Points => {
            let set = node.as_point_set().ok();
            let count = set.map_or(0, |s| s.len());
            (format!("{count} points"), set.map(|s| s.bounds()))
        }
        NodeKind::Curves => {
            let polylines = node.as_polylines().unwrap_or_default();
            let mut bounds = BBox3f::EMPTY;
            for p in polylines.iter().flat_map(|c| c.points.iter()) {
                bounds.expand_by_point(*p);
            }
            (format!("{} polylines", polylines.len()), Some(bounds))
        }
        NodeKind::PolyMesh => {
            let mesh = node.as_mesh().unwrap_or_default();
            (
                format!("{} triangles, uvs: {}", mesh.num_triangles(), mesh.has_uvs()),
                Some(mesh.bounds()),
            )
        }
        _ => (String::new(), None),
    };

    let bounds = bounds.filter(|b| !b.is_empty());
    match &bounds {
        Some(b) => println!(
            "{} [{}] {summary}, bounds ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
            node.name(),
            node.type_name(),
            b.min.x, b.min.y, b.min.z,
            b.max.x, b.max.y, b.max.z,
        ),
        None => println!("{} [{}] {summary}", node.name(), node.type_name()),
    }
    bounds
}

fn cmd_play(mut session: Session, mut playback: Playback, frames: u32, fps: f64) -> anyhow::Result<()> {
    if fps <= 0.0 {
        bail!("fps must be positive");
    }
    let dt = 1.0 / fps;

    for frame in 0..frames {
        let time = playback.tick(&mut session, dt);
        let mut stats = DrawStats::default();
        session.draw(&mut stats);
        println!(
            "frame {frame:4}  t={time:.3}  points={} polylines={} triangles={}",
            stats.points, stats.polylines, stats.triangles
        );
    }
    Ok(())
}
