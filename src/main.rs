//! Simulation entry point: run the exploration loop against the
//! synthetic camera and a logging actuator.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};

use drishti_nav::exploration::sim::{LoggingActuator, SimulatedCamera};
use drishti_nav::{NavConfig, NavigationEngine};

#[derive(Parser, Debug)]
#[command(name = "drishti-nav", about = "Camera-only exploration engine")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum exploration steps before stopping.
    #[arg(long, default_value_t = 120)]
    steps: u64,

    /// Journal file for persisting the map across runs.
    #[arg(long)]
    journal: Option<PathBuf>,

    /// Seed for the simulated camera.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match NavConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => NavConfig::default(),
    };

    let engine = match &args.journal {
        Some(path) => NavigationEngine::with_journal(config, path),
        None => NavigationEngine::new(config),
    };
    let engine = match engine {
        Ok(e) => Arc::new(e),
        Err(e) => {
            error!("Failed to initialize engine: {}", e);
            std::process::exit(1);
        }
    };

    let ctrlc_engine = Arc::clone(&engine);
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Interrupt received, stopping exploration");
        ctrlc_engine.request_stop();
    }) {
        error!("Failed to install signal handler: {}", e);
    }

    let camera = Box::new(SimulatedCamera::new(args.seed));
    let actuator = Box::new(LoggingActuator::new());

    if let Err(e) = engine.start_exploration(camera, actuator, Some(args.steps)) {
        error!("Failed to start exploration: {}", e);
        std::process::exit(1);
    }
    engine.join();

    let status = engine.status();
    info!(
        "Run complete: state={} steps={} visited={} obstacles={} avoided={} pose=({:.2}, {:.2}, {:.0} deg)",
        status.state.as_str(),
        status.steps,
        status.visited_cells,
        status.obstacle_cells,
        status.obstacles_avoided,
        status.pose.x,
        status.pose.y,
        status.pose.heading_deg,
    );

    let nearby = engine.obstacles_nearby();
    if !nearby.is_empty() {
        info!("Obstacles near final position: {:?}", nearby);
    }
}
