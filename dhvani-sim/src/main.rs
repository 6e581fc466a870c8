//! DhvaniSim - run navigation scenarios headless
//!
//! # Usage
//!
//! ```bash
//! # Run a scenario with its own engine settings
//! dhvani-sim run dhvani-sim/scenarios/corridor_switch.yaml
//!
//! # Override engine settings and the tick budget
//! dhvani-sim run dhvani-sim/scenarios/door_wait.yaml --config configs/dhvani.yaml --ticks 2000
//!
//! # Validate an engine configuration file
//! dhvani-sim check-config configs/dhvani.yaml
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `dhvani_sim=info,dhvani_nav=info`).

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dhvani_nav::NavConfig;
use dhvani_sim::world::TranscriptEvent;
use dhvani_sim::{Result, Scenario, Simulation};

#[derive(Parser)]
#[command(name = "dhvani-sim")]
#[command(about = "Headless simulator for the dhvani navigation engine")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario and check its expectations
    Run {
        /// Scenario YAML file
        scenario: PathBuf,

        /// Engine configuration replacing the scenario's own
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Tick budget replacing the scenario's own
        #[arg(short, long)]
        ticks: Option<u32>,

        /// Do not print the transcript
        #[arg(short, long)]
        quiet: bool,
    },

    /// Load and validate an engine configuration file
    CheckConfig {
        /// Engine configuration YAML file
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dhvani_sim=info,dhvani_nav=info")),
        )
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            scenario,
            config,
            ticks,
            quiet,
        } => run(scenario, config, ticks, quiet),
        Commands::CheckConfig { config } => check_config(config),
    };

    if let Err(e) = &result {
        error!(code = e.code(), "{}", e);
    }
    result
}

fn run(path: PathBuf, config: Option<PathBuf>, ticks: Option<u32>, quiet: bool) -> Result<()> {
    info!("Loading scenario from {:?}", path);
    let scenario = Scenario::load(&path)?;
    if !scenario.description.is_empty() {
        info!("{}", scenario.description);
    }

    let nav = match config {
        Some(config_path) => {
            info!("Loading engine configuration from {:?}", config_path);
            NavConfig::load(&config_path)?
        }
        None => scenario.nav.clone(),
    };

    let mut sim = Simulation::with_config(&scenario, nav)?;
    let outcome = sim.run(ticks.unwrap_or(scenario.max_ticks));

    if !quiet {
        for entry in sim.world().transcript() {
            match &entry.event {
                TranscriptEvent::Speech { text, .. } => println!("{:>7} ms  say   {}", entry.at_ms, text),
                TranscriptEvent::Jump => println!("{:>7} ms  jump", entry.at_ms),
                TranscriptEvent::DoorOpening(id) => {
                    println!("{:>7} ms  door  {} opening", entry.at_ms, id.0)
                }
                TranscriptEvent::Tone { .. } => {}
            }
        }
    }

    info!("{}", outcome.summary());
    scenario.expect.verify(&outcome)?;
    info!("All expectations met");
    Ok(())
}

fn check_config(path: PathBuf) -> Result<()> {
    let config = NavConfig::load(&path)?;
    info!(
        "{:?} is valid: arrival {:.0}, stuck window {} ticks, {} strategy cycles",
        path,
        config.navigation.arrival_distance,
        config.navigation.stuck_ticks,
        config.strategy.cycle_limit
    );
    print!("{}", config.to_yaml()?);
    Ok(())
}
