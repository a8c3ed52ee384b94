//! QAOA command implementation.

use anyhow::{Context, Result};
use clap::Args;
use console::style;

use hybridq_problems::ProblemKind;
use hybridq_variational::QaoaSolver;

use super::common::{GraphArgs, KindArg, RunArgs, print_json, resolve_graph, simulator, spinner};
use super::vqe::print_outcome;
use crate::config::HybridqConfig;

/// Arguments of `hybridq qaoa`.
#[derive(Debug, Clone, Args)]
pub struct QaoaArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Problem family (maxcut, vertex-cover)
    #[arg(short, long, value_enum, default_value = "maxcut")]
    pub kind: KindArg,

    /// Number of cost/mixer rounds
    #[arg(short = 'p', long, default_value = "1")]
    pub layers: usize,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Execute the qaoa command.
pub async fn execute(args: &QaoaArgs, config: &HybridqConfig) -> Result<()> {
    let adjacency = resolve_graph(&args.graph)?;
    let kind: ProblemKind = args.kind.into();
    let Some(problem) = kind.ising(&adjacency) else {
        anyhow::bail!("{kind:?} has no Ising form; use `hybridq vqe --kind` instead");
    };

    if !args.run.json {
        println!(
            "{} QAOA p={} for {:?} on {} vertices ({} edges)",
            style("→").cyan().bold(),
            args.layers,
            kind,
            style(adjacency.num_vertices()).green(),
            adjacency.num_edges()
        );
    }

    let mut solver = QaoaSolver::new(args.layers)
        .with_config(config.optimizer.to_optimizer_config())
        .with_shots(args.run.shots.unwrap_or(config.simulator.shots))
        .with_restarts(args.run.restarts.unwrap_or(config.optimizer.restarts));
    if let Some(max_iterations) = args.run.max_iterations {
        solver = solver.with_max_iterations(max_iterations);
    }
    if let Some(seed) = args.run.seed.or(config.optimizer.seed) {
        solver = solver.with_seed(seed);
    }
    if let Some(params) = &args.run.initial_params {
        solver = solver.with_initial_params(params.clone());
    }

    let backend = simulator(config);
    let progress = spinner("Optimizing angles...", args.run.json)?;
    let outcome = solver.solve(&backend, &problem).await;
    progress.finish_and_clear();
    let outcome = outcome.context("QAOA failed")?;

    if args.run.json {
        return print_json(&outcome);
    }
    print_outcome(&outcome);
    if let Some(state) = &outcome.most_likely {
        if let Ok(index) = usize::from_str_radix(state, 2) {
            println!(
                "\n  Classical energy of {}: {:.6}",
                style(state).cyan(),
                problem.energy(index)
            );
        }
    }
    if let Some(sampled) = problem.expectation_from_counts(outcome.counts.iter()) {
        println!("  Shot-averaged energy: {sampled:.6}");
    }
    Ok(())
}
