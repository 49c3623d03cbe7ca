//! Headless host for the flock engine.
//!
//! Loads a configuration (file or built-in preset), then ticks the flock at
//! the configured framerate until a tick limit is reached or Ctrl+C is
//! pressed. Rendering is left to other hosts; this one only logs.

use boids_config::{Config, ConfigError, ConfigLoader, Preset};
use boids_simulation::{Flock, SimulationError};
use clap::Parser;
use hdrhistogram::Histogram;
use log::{error, info, warn};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON or TOML simulation configuration file
    #[arg(short, long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Built-in setup to run when no config file is given
    #[arg(short, long, value_enum)]
    preset: Option<Preset>,

    /// Stop after this many ticks (0 runs until Ctrl+C)
    #[arg(short, long, default_value_t = 0)]
    ticks: u64,

    /// Override the RNG seed from the configuration
    #[arg(long)]
    seed: Option<u64>,

    /// Tick as fast as possible instead of at the configured framerate
    #[arg(long)]
    no_pacing: bool,
}

#[derive(Error, Debug)]
enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("Failed to install Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("Failed to create tick histogram: {0}")]
    Histogram(#[from] hdrhistogram::CreationError),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), RunnerError> {
    let config = load_config(args)?;
    let mut flock = Flock::new(&config.simulation)?;

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))?;
    }

    let framerate = config.runner.framerate;
    let log_every = config.runner.log_every;
    let frame_duration = Duration::from_secs_f64(1.0 / framerate as f64);
    // Tick durations in microseconds
    let mut tick_times = Histogram::<u64>::new(3)?;

    if args.no_pacing {
        info!("Running simulation unpaced...");
    } else {
        info!("Running simulation at {} FPS...", framerate);
    }

    while running.load(Ordering::SeqCst) && (args.ticks == 0 || flock.tick_count() < args.ticks) {
        let frame_start = Instant::now();

        let summary = flock.tick();

        let elapsed = frame_start.elapsed();
        tick_times.saturating_record(elapsed.as_micros() as u64);

        if log_every > 0 && summary.tick % log_every == 0 {
            info!(
                "tick {}: {} fleeing, {} pursuing, mean prey speed {:.2}",
                summary.tick, summary.fleeing, summary.pursuing, summary.mean_prey_speed
            );
            flock.log_state();
        }

        if args.no_pacing {
            continue;
        }
        if elapsed < frame_duration {
            spin_sleep::sleep(frame_duration - elapsed);
        } else if framerate > 10 {
            // Only show warning if target framerate is high enough to matter
            warn!("Tick time exceeded budget: {:?} > {:?}", elapsed, frame_duration);
        }
    }

    info!("Stopped after {} ticks", flock.tick_count());
    if !tick_times.is_empty() {
        info!(
            "Tick time (us): mean {:.1}, p50 {}, p99 {}, max {}",
            tick_times.mean(),
            tick_times.value_at_quantile(0.5),
            tick_times.value_at_quantile(0.99),
            tick_times.max()
        );
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<Config, ConfigError> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Using configuration from {}", path.display());
            ConfigLoader::from_file(path)?
        }
        None => {
            let preset = args.preset.unwrap_or(Preset::Classic);
            info!("Using the {:?} preset", preset);
            preset.config()
        }
    };

    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }

    ConfigLoader::validate(&config)?;
    Ok(config)
}
