//! habitat - E-Habitat node simulator
//!
//! Usage:
//!   habitat run --duration 60 --output telemetry.csv     # Simulate one node
//!   habitat baseline --output baseline.json              # Normal-operation features
//!   habitat train --input baseline.json --output model.json
//!
//! Set `RUST_LOG` to change log verbosity (default `info`).

mod export;

use std::path::PathBuf;
use std::thread;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::{Args, Parser, Subcommand};
use habitat_core::constants::{DEFAULT_SEED, DEFAULT_WINDOW_SIZE};
use habitat_core::{NodeConfig, SimulatedTime, SystemTime, TimeSource};
use habitat_ml::baseline::{BASELINE_NODE_ID, DEFAULT_BASELINE_STEPS};
use habitat_ml::{
    generate_baseline, train, BaselineSet, ModelArtifactExt, TrainingConfig, DEFAULT_CONTAMINATION,
    DEFAULT_NUM_TREES, DEFAULT_TRAINING_SEED,
};

use export::TelemetryOutput;

#[derive(Parser)]
#[command(name = "habitat")]
#[command(about = "Compute-node environment simulation with isolation-forest anomaly detection")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Step a virtual node and emit its telemetry
    Run(RunArgs),

    /// Generate baseline feature vectors from normal operation
    Baseline {
        /// Number of simulation steps
        #[arg(long, default_value_t = DEFAULT_BASELINE_STEPS)]
        steps: usize,

        /// Random seed
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Feature window size
        #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
        window: usize,

        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Train an anomaly model on a baseline file
    Train {
        /// Baseline JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output model artifact
        #[arg(short, long)]
        output: PathBuf,

        /// Number of trees
        #[arg(long, default_value_t = DEFAULT_NUM_TREES)]
        trees: usize,

        /// Expected share of outliers in the baseline
        #[arg(long, default_value_t = DEFAULT_CONTAMINATION)]
        contamination: f64,

        /// Random seed
        #[arg(long, default_value_t = DEFAULT_TRAINING_SEED)]
        seed: u64,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Number of one-second steps
    #[arg(long)]
    duration: u64,

    /// Random seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// CSV output file (default: JSON lines on stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Anomaly model artifact (overrides the config file)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Node configuration TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sleep one second between steps and stamp records with wall-clock time
    #[arg(long)]
    realtime: bool,

    /// Step at which to inject a thermal spike
    #[arg(long)]
    spike_at: Option<u64>,

    /// Spiked steps
    #[arg(long, default_value_t = 10)]
    spike_duration: u32,

    /// Spike size (°C)
    #[arg(long, default_value_t = 5.0)]
    spike_magnitude: f64,

    /// Step at which the fan fails
    #[arg(long)]
    fan_failure_at: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Baseline {
            steps,
            seed,
            window,
            output,
        } => baseline(steps, seed, window, output),
        Commands::Train {
            input,
            output,
            trees,
            contamination,
            seed,
        } => train_model(input, output, trees, contamination, seed),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => NodeConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => NodeConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.model.is_some() {
        config.model_path = args.model.clone();
    }

    let clock: Box<dyn TimeSource> = if args.realtime {
        Box::new(SystemTime)
    } else {
        Box::new(SimulatedTime::new(Utc::now(), Duration::seconds(1)))
    };
    let mut builder = config.node_builder().time_source(clock);
    if let Some(path) = &config.model_path {
        builder = builder.model_artifact(path);
    }
    let mut node = builder.build().context("building node")?;

    log::info!(
        "running {} for {} steps (seed {:?}, detection {})",
        node.node_id(),
        args.duration,
        config.seed,
        if node.detection_enabled() { "on" } else { "off" }
    );

    let mut output = TelemetryOutput::open(args.output.as_deref())?;
    for step in 0..args.duration {
        if args.spike_at == Some(step) {
            node.inject_thermal_spike(args.spike_duration, args.spike_magnitude);
        }
        if args.fan_failure_at == Some(step) {
            node.simulate_fan_failure();
        }

        let record = node.step();
        output.write(&record)?;

        if args.realtime && step + 1 < args.duration {
            thread::sleep(StdDuration::from_secs(1));
        }
    }
    output.finish()
}

fn baseline(steps: usize, seed: u64, window: usize, output: PathBuf) -> Result<()> {
    let config = NodeConfig {
        node_id: BASELINE_NODE_ID.to_string(),
        seed: Some(seed),
        window_size: window,
        ..NodeConfig::default()
    };
    let set = generate_baseline(&config, steps).context("generating baseline")?;
    set.save(&output)
        .with_context(|| format!("writing {}", output.display()))?;
    log::info!("baseline saved to {}", output.display());
    Ok(())
}

fn train_model(
    input: PathBuf,
    output: PathBuf,
    trees: usize,
    contamination: f64,
    seed: u64,
) -> Result<()> {
    let set = BaselineSet::load(&input)
        .with_context(|| format!("loading baseline {}", input.display()))?;
    let config = TrainingConfig {
        num_trees: trees,
        contamination,
        seed,
        ..TrainingConfig::default()
    };
    let model = train(&set, &config).context("training model")?;
    model
        .save(&output)
        .with_context(|| format!("writing {}", output.display()))?;

    log::info!(
        "model summary: samples={} contamination={} trees={} location={}",
        set.len(),
        contamination,
        trees,
        output.display()
    );
    Ok(())
}
