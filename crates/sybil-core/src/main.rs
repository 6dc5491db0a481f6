//! Sybil Spread Simulation
//!
//! Runs one seeded simulation from the command line and writes metrics,
//! network snapshots and the interaction event log to the output directory.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sybil_core::config::{Config, DEFAULT_CONFIG_PATH};
use sybil_core::events::EventLogger;
use sybil_core::output::{
    generate_snapshot, write_current_state, write_metrics_to_dir, write_snapshot_to_dir,
    SnapshotGenerator,
};
use sybil_core::Simulation;
use sybil_events::NetworkSnapshot;

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "sybil_sim")]
#[command(about = "Simulates the spread of Sybil identity forgery across a random network")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Interval between network snapshots (in ticks)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Output directory
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long)]
    num_nodes: Option<usize>,

    #[arg(long)]
    avg_node_degree: Option<f64>,

    #[arg(long)]
    initial_sybil_nodes: Option<usize>,

    #[arg(long)]
    sybil_identity_count: Option<usize>,

    /// Chance of an interaction per neighbor visit
    #[arg(long)]
    interaction_chance: Option<f64>,

    /// Maximum interactions per agent per tick
    #[arg(long)]
    max_interactions: Option<usize>,

    /// Do not write events.jsonl
    #[arg(long)]
    no_events: bool,
}

impl Args {
    /// Command line values take precedence over the configuration file
    fn apply_overrides(&self, config: &mut Config) {
        let model = &mut config.model;
        if let Some(v) = self.num_nodes {
            model.num_nodes = v;
        }
        if let Some(v) = self.avg_node_degree {
            model.avg_node_degree = v;
        }
        if let Some(v) = self.initial_sybil_nodes {
            model.initial_sybil_nodes = v;
        }
        if let Some(v) = self.sybil_identity_count {
            model.sybil_identity_count = v;
        }
        if let Some(v) = self.interaction_chance {
            model.normal_to_sybil_interaction_chance = v;
        }
        if let Some(v) = self.max_interactions {
            model.max_interactions_per_step = v;
        }

        let run = &mut config.run;
        if let Some(v) = self.seed {
            run.seed = v;
        }
        if let Some(v) = self.ticks {
            run.ticks = v;
        }
        if let Some(v) = self.snapshot_interval {
            run.snapshot_interval = v;
        }
        if let Some(ref v) = self.output {
            run.output_dir = v.display().to_string();
        }
        if self.no_events {
            run.write_events = false;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = Config::load_or_default(&args.config)?;
    args.apply_overrides(&mut config);
    config.model.validate()?;

    let model = &config.model;
    let run = &config.run;
    let output_dir = Path::new(&run.output_dir);

    println!("Sybil Spread Simulation");
    println!("=======================");
    println!("Seed: {}", run.seed);
    println!("Ticks: {}", run.ticks);
    println!("Nodes: {} (avg degree {})", model.num_nodes, model.avg_node_degree);
    println!("Initial sybil nodes: {}", model.initial_sybil_nodes);
    println!("Interaction chance: {}", model.normal_to_sybil_interaction_chance);
    println!("Snapshot interval: {}", run.snapshot_interval);
    println!();

    fs::create_dir_all(output_dir.join("snapshots"))?;

    let mut simulation = Simulation::new(model, run.seed)?;
    println!(
        "Created network: {} nodes, {} edges",
        simulation.network().node_count(),
        simulation.network().edge_count()
    );

    let mut events = if run.write_events {
        EventLogger::new(output_dir.join("events.jsonl"))?
    } else {
        EventLogger::null()
    };

    let mut generator = SnapshotGenerator::new(run.snapshot_interval);
    let initial = generate_snapshot(&simulation, &mut generator, "simulation_start");
    write_outputs(&initial, output_dir)?;
    report(&initial);

    for _ in 0..run.ticks {
        if !simulation.is_running() {
            println!("Simulation halted at tick {}.", simulation.tick());
            break;
        }

        simulation.step();
        events.log_batch(&simulation.drain_events())?;

        let tick = simulation.tick();
        if generator.should_snapshot(tick) {
            let snapshot = generate_snapshot(&simulation, &mut generator, "periodic");
            write_outputs(&snapshot, output_dir)?;
            report(&snapshot);
        }
    }

    if generator.last_snapshot_tick() != Some(simulation.tick()) {
        let last = generate_snapshot(&simulation, &mut generator, "simulation_end");
        write_outputs(&last, output_dir)?;
        report(&last);
    }

    events.flush()?;
    write_metrics_to_dir(simulation.time_series(), output_dir)?;

    println!();
    println!("Simulation complete. Ran {} ticks.", simulation.tick());
    println!("Generated {} snapshots.", generator.snapshot_count());
    println!(
        "Logged {} events ({} conversions).",
        events.event_count(),
        events.conversion_count()
    );
    println!("Output written to {}", output_dir.display());

    Ok(())
}

fn write_outputs(snapshot: &NetworkSnapshot, output_dir: &Path) -> std::io::Result<()> {
    write_snapshot_to_dir(snapshot, output_dir)?;
    write_current_state(snapshot, output_dir)
}

fn report(snapshot: &NetworkSnapshot) {
    let metrics = &snapshot.metrics;
    println!(
        "[Tick {:>4}] normal: {:>4}  sybil: {:>4}  avg confidence: {:.3}  sybil/normal: {}",
        metrics.tick,
        metrics.normal,
        metrics.sybil,
        metrics.average_confidence,
        metrics.ratio_label()
    );
}
