//! Quantum walk command implementation.

use anyhow::{Context, Result};
use clap::Args;
use console::style;

use hybridq_walk::{QuantumWalk, WalkOutcome};

use super::common::{GraphArgs, print_counts, print_json, resolve_graph, simulator, spinner};
use crate::config::HybridqConfig;

/// Arguments of `hybridq walk`.
#[derive(Debug, Clone, Args)]
pub struct WalkArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Start vertex
    #[arg(long, default_value = "0")]
    pub start: usize,

    /// Number of time steps
    #[arg(long)]
    pub steps: Option<usize>,

    /// Time between snapshots
    #[arg(long)]
    pub dt: Option<f64>,

    /// Shots for the final sampling
    #[arg(short, long)]
    pub shots: Option<u32>,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the walk command.
pub async fn execute(args: &WalkArgs, config: &HybridqConfig) -> Result<()> {
    let adjacency = resolve_graph(&args.graph)?;
    let mut walk_config = config.walk.to_walk_config();
    if let Some(steps) = args.steps {
        walk_config.num_steps = steps;
    }
    if let Some(dt) = args.dt {
        walk_config.dt = dt;
    }
    if let Some(shots) = args.shots {
        walk_config.shots = shots;
    }

    let walk = QuantumWalk::new(adjacency, args.start).context("Invalid walk")?;
    if !args.json {
        println!(
            "{} Walk from vertex {} on {} vertices ({} qubits), {} steps of dt={}",
            style("→").cyan().bold(),
            style(args.start).green(),
            walk.num_vertices(),
            walk.num_qubits(),
            walk_config.num_steps,
            walk_config.dt
        );
    }

    let backend = simulator(config);
    let progress = spinner("Evolving...", args.json)?;
    let outcome = walk.run(&backend, walk_config).await;
    progress.finish_and_clear();
    let outcome = outcome.context("Quantum walk failed")?;

    if args.json {
        return print_json(&outcome);
    }
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &WalkOutcome) {
    println!("\n{} Probability evolution:", style("✓").green().bold());
    for snapshot in &outcome.probability_evolution {
        let cells: Vec<String> = snapshot
            .probabilities
            .iter()
            .map(|p| format!("{p:.3}"))
            .collect();
        println!(
            "  t={:>8.4}  {}",
            snapshot.time,
            style(cells.join(" ")).dim()
        );
    }

    print_counts(&outcome.final_counts);
    println!(
        "\n  Most likely vertex: {} ({})",
        style(outcome.most_likely_vertex).yellow(),
        style(&outcome.most_likely_state).cyan()
    );
}
