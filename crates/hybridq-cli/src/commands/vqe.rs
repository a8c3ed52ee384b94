//! VQE command implementation.

use anyhow::{Context, Result};
use clap::Args;
use console::style;

use hybridq_problems::{ProblemKind, WeightedOperator, parse_expression};
use hybridq_variational::{VariationalOutcome, VqeSolver};

use super::common::{
    GraphArgs, KindArg, RunArgs, format_values, print_counts, print_json, resolve_graph,
    simulator, spinner,
};
use crate::config::HybridqConfig;

/// Arguments of `hybridq vqe`.
#[derive(Debug, Clone, Args)]
pub struct VqeArgs {
    /// Hamiltonian as free text, e.g. "Z0 Z1 + 0.5 X0"
    #[arg(short, long, conflicts_with_all = ["labels", "kind"])]
    pub expression: Option<String>,

    /// Register width for --expression
    #[arg(short, long)]
    pub qubits: Option<usize>,

    /// Basis strings, e.g. ZZ,IZ (qubit 0 is the rightmost letter)
    #[arg(long, value_delimiter = ',', requires = "coefficients", conflicts_with = "kind")]
    pub labels: Option<Vec<String>>,

    /// Coefficients matching --labels
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub coefficients: Option<Vec<f64>>,

    /// Problem built from a graph
    #[arg(short, long, value_enum)]
    pub kind: Option<KindArg>,

    #[command(flatten)]
    pub graph: GraphArgs,

    /// Rotation/entangler repetitions
    #[arg(short, long, default_value = "1")]
    pub depth: usize,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Build the operator from whichever input was given.
fn resolve_operator(args: &VqeArgs) -> Result<WeightedOperator> {
    if let Some(text) = &args.expression {
        let Some(n) = args.qubits else {
            anyhow::bail!("--expression requires --qubits");
        };
        let operator = parse_expression(text, n);
        if operator.is_zero() {
            tracing::warn!(expression = %text, "expression reduced to the zero operator");
        }
        return Ok(operator);
    }

    if let (Some(labels), Some(coefficients)) = (&args.labels, &args.coefficients) {
        return WeightedOperator::from_labels(labels, coefficients)
            .context("Invalid basis/coefficient list");
    }

    if args.graph.is_set() || args.kind.is_some() {
        let adjacency = resolve_graph(&args.graph)?;
        let kind: ProblemKind = args.kind.unwrap_or(KindArg::Maxcut).into();
        return Ok(kind.operator(&adjacency));
    }

    anyhow::bail!("No Hamiltonian given. Use --expression, --labels/--coefficients, or a graph")
}

/// Execute the vqe command.
pub async fn execute(args: &VqeArgs, config: &HybridqConfig) -> Result<()> {
    let operator = resolve_operator(args)?;
    let num_qubits = operator.num_qubits();

    if !args.run.json {
        println!(
            "{} VQE on {} qubits, {} terms, depth {}",
            style("→").cyan().bold(),
            style(num_qubits).green(),
            operator.num_terms(),
            args.depth
        );
    }

    let mut solver = VqeSolver::new(num_qubits)
        .with_depth(args.depth)
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
    let progress = spinner("Optimizing...", args.run.json)?;
    let outcome = solver.solve(&backend, &operator).await;
    progress.finish_and_clear();
    let outcome = outcome.context("VQE failed")?;

    if args.run.json {
        return print_json(&outcome);
    }
    print_outcome(&outcome);
    Ok(())
}

/// Human-readable summary shared by vqe and qaoa.
pub fn print_outcome(outcome: &VariationalOutcome) {
    let marker = if outcome.error.is_some() {
        style("✗").red().bold()
    } else {
        style("✓").green().bold()
    };
    println!("\n{} {} ({})", marker, outcome.message, outcome.status);

    match outcome.optimal_energy {
        Some(e) => println!("  Energy:      {}", style(format!("{e:.6}")).yellow()),
        None => println!("  Energy:      {}", style("n/a").dim()),
    }
    println!("  Parameters:  {}", format_values(&outcome.optimal_params));
    if let (Some(gammas), Some(betas)) = (&outcome.gammas, &outcome.betas) {
        println!("  Gammas:      {}", format_values(gammas));
        println!("  Betas:       {}", format_values(betas));
    }
    println!(
        "  Evaluations: {} ({} iterations)",
        outcome.evaluations, outcome.iterations
    );
    if let Some(error) = &outcome.error {
        println!("  Error:       {}", style(error).red());
    }
    if let Some(state) = &outcome.most_likely {
        println!("  Most likely: {}", style(state).cyan());
    }

    if !outcome.counts.is_empty() {
        print_counts(&outcome.counts);
    }
}
