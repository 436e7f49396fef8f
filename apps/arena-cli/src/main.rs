mod script;

use anyhow::Context;
use arena_common::LightId;
use arena_input::CameraConfig;
use arena_overlay::{BackgroundAnimator, InMemoryOverlay, OverlayConfig, OverlayHost};
use arena_render::{EnvironmentContext, RecordingBackend, ShadowRegistry};
use arena_world::{GeometryConfig, Layout, SeededSource, ThreadSource, generate};
use clap::{Parser, Subcommand};
use script::{ScriptEvent, ScriptRunner};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arena-cli", about = "CLI tool for walled arena layouts and controls")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Generate a layout and hand it to a headless backend
    Generate {
        /// Geometry config (YAML); defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Seed for reproducible placement; thread RNG when omitted
        #[arg(short, long)]
        seed: Option<u64>,
        /// Print the layout as JSON instead of the backend trace
        #[arg(long)]
        json: bool,
    },
    /// Check a geometry config without generating anything
    Validate {
        /// Geometry config (YAML)
        config: PathBuf,
    },
    /// Rebuild the background overlay for a container size
    Overlay {
        #[arg(long, default_value = "20")]
        columns: u32,
        #[arg(long, default_value = "50")]
        rows: u32,
        #[arg(long, default_value = "1000")]
        width: u32,
        #[arg(long, default_value = "800")]
        height: u32,
        /// Rebuild this many times to check nothing accumulates
        #[arg(long, default_value = "1")]
        repeat: u32,
    },
    /// Run a scripted control session, e.g. `press,grant,down:KeyW,tick:0.5,look:10:0`
    Controls {
        #[arg(value_delimiter = ',', required = true)]
        events: Vec<String>,
        /// Simulate a host without pointer lock
        #[arg(long)]
        no_lock: bool,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<GeometryConfig> {
    match path {
        Some(p) => GeometryConfig::load(p)
            .with_context(|| format!("loading geometry config {}", p.display())),
        None => Ok(GeometryConfig::default()),
    }
}

fn generate_with(config: &GeometryConfig, seed: Option<u64>) -> anyhow::Result<Layout> {
    let layout = match seed {
        Some(seed) => generate(config, &mut SeededSource::new(seed)),
        None => generate(config, &mut ThreadSource::new()),
    }?;
    tracing::info!(structures = layout.len(), seeded = seed.is_some(), "layout generated");
    Ok(layout)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("arena-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", arena_common::crate_info());
            println!("world: {}", arena_world::crate_info());
            println!("render: {}", arena_render::crate_info());
            println!("input: {}", arena_input::crate_info());
            println!("overlay: {}", arena_overlay::crate_info());
        }
        Commands::Generate { config, seed, json } => {
            let config = load_config(config.as_deref())?;
            let layout = generate_with(&config, seed)?;
            let fingerprint = layout.fingerprint();

            if json {
                println!("{}", serde_json::to_string_pretty(&layout)?);
                return Ok(());
            }

            let buildings = layout.buildings().count();
            let mut backend = RecordingBackend::new();
            let scene = EnvironmentContext::new(&mut backend, &config).instantiate(layout);
            let casters =
                ShadowRegistry::new().register_casters(&mut backend, &scene, LightId(0));

            print!("{}", backend.describe());
            println!(
                "Structures: {} (buildings={buildings}), shadow casters: {casters}",
                scene.len()
            );
            match seed {
                Some(seed) => println!("Fingerprint: {fingerprint:#018x} (seed={seed})"),
                None => println!("Fingerprint: {fingerprint:#018x}"),
            }
        }
        Commands::Validate { config } => {
            let config = load_config(Some(&config))?;
            println!(
                "OK: ground {}x{}, {}..={} buildings, {} material variants",
                config.ground_width,
                config.ground_depth,
                config.building_count.min,
                config.building_count.max,
                config.material_variants.len()
            );
        }
        Commands::Overlay {
            columns,
            rows,
            width,
            height,
            repeat,
        } => {
            let overlay_config = OverlayConfig {
                columns,
                rows,
                ..OverlayConfig::default()
            };
            let mut animator = BackgroundAnimator::new(Some(InMemoryOverlay::new()), overlay_config);
            for _ in 0..repeat.max(1) {
                animator.request_rebuild(width, height);
                animator.flush()?;
            }
            let grid = animator.grid().context("overlay was never built")?;
            let host = animator.host().context("overlay container missing")?;
            println!(
                "Grid {}x{}: cells={} of {}x{}px, animations running={} (started={}, cancelled={})",
                grid.columns,
                grid.rows,
                host.cell_count(),
                grid.cell_width,
                grid.cell_height,
                host.running().len(),
                host.started(),
                host.cancelled()
            );
        }
        Commands::Controls { events, no_lock } => {
            let events = events
                .iter()
                .map(|e| e.parse::<ScriptEvent>())
                .collect::<anyhow::Result<Vec<_>>>()?;
            let mut runner = ScriptRunner::new(!no_lock, &CameraConfig::default());
            for event in &events {
                let line = runner.apply(event);
                println!("{line:<48} locked={}", runner.control.is_locked());
            }
            let p = runner.camera.position;
            println!(
                "Final: {:?}, camera=({:.2}, {:.2}, {:.2})",
                runner.control.lock_state(),
                p.x,
                p.y,
                p.z
            );
        }
    }

    Ok(())
}
