/// tilecube terminal demo - a cube on a random tile floor
///
/// Controls:
///   - Arrow Keys: Move the cube between tiles
///   - W/S, A/D: Pitch and yaw the camera
///   - Q/E: Roll
///   - O/P: Start and stop the rotation animation
///   - 1/2/3: Flat, dimetric and perspective views
///   - ESC: Quit
use anyhow::Context;
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tilecube_core::{CubeFill, ProjectionMode, Renderer, Scene, SceneConfig};
use tilecube_terminal::TerminalApp;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tilecube-terminal", about = "Render a cube on a tile floor in the terminal")]
struct Cli {
    /// Seed for the tile layout (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Initial projection for the tiles
    #[arg(short, long, value_enum, default_value_t = Mode::Perspective)]
    mode: Mode,

    /// Distance from the eye to the screen plane
    #[arg(long, default_value_t = 500.0)]
    focal_length: f64,

    /// Scene units per terminal column
    #[arg(short, long, default_value_t = 4.0)]
    zoom: f64,

    /// Fill only the cube faces that pass back-face culling
    #[arg(long)]
    corrected_fill: bool,

    /// Write logs to this file (the terminal itself is taken by the view)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Flat,
    Dimetric,
    Perspective,
}

impl From<Mode> for ProjectionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Flat => ProjectionMode::Flat,
            Mode::Dimetric => ProjectionMode::Dimetric,
            Mode::Perspective => ProjectionMode::Perspective,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new(filter))
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new(filter))
                .with_writer(std::io::sink)
                .init();
        }
    }

    anyhow::ensure!(cli.zoom > 0.0, "zoom must be positive, got {}", cli.zoom);

    let config = SceneConfig {
        mode: cli.mode.into(),
        focal_length: cli.focal_length,
        ..SceneConfig::default()
    };
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let scene = Scene::generate(&mut rng, config).context("failed to build the scene")?;

    let fill = if cli.corrected_fill {
        CubeFill::VisibleFaces
    } else {
        CubeFill::EveryFace
    };

    let mut app = TerminalApp::new(scene, Renderer::new(fill), cli.zoom)?;
    app.run()?;

    Ok(())
}
