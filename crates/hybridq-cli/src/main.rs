//! hybridq Command-Line Interface
//!
//! Runs VQE, QAOA and continuous-time quantum walks on the local
//! statevector simulator.
//!
//! ```text
//! hybridq vqe --expression "Z0 Z1 + 0.5 X0" --qubits 2
//! hybridq qaoa --topology cycle -n 6 -p 2 --seed 7
//! hybridq walk --topology star -n 5 --steps 20 --dt 0.1 --json
//! hybridq graph --adjacency graph.json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::graph::GraphCommandArgs;
use commands::qaoa::QaoaArgs;
use commands::vqe::VqeArgs;
use commands::walk::WalkArgs;
use commands::{graph, qaoa, vqe, walk};
use config::HybridqConfig;

/// hybridq - hybrid quantum-classical optimization and quantum walks
#[derive(Parser)]
#[command(name = "hybridq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (YAML)
    #[arg(short, long, global = true, env = "HYBRIDQ_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the ground-state energy of a Hamiltonian with VQE
    Vqe(VqeArgs),

    /// Solve a graph problem with QAOA
    Qaoa(QaoaArgs),

    /// Run a continuous-time quantum walk on a graph
    Walk(WalkArgs),

    /// Inspect a graph
    Graph(GraphCommandArgs),
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let config = HybridqConfig::load(cli.config.as_deref()).context("Invalid configuration")?;

    match cli.command {
        Commands::Vqe(args) => vqe::execute(&args, &config).await,
        Commands::Qaoa(args) => qaoa::execute(&args, &config).await,
        Commands::Walk(args) => walk::execute(&args, &config).await,
        Commands::Graph(args) => graph::execute(&args).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // RUST_LOG wins over -v
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Handle errors
    if let Err(e) = dispatch(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::common::KindArg;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("hybridq").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_vqe_expression() {
        let cli = parse(&["vqe", "-e", "Z0 Z1 + 0.5 X0", "-q", "2", "--seed", "3"]).unwrap();
        let Commands::Vqe(args) = cli.command else {
            panic!("expected vqe");
        };
        assert_eq!(args.expression.as_deref(), Some("Z0 Z1 + 0.5 X0"));
        assert_eq!(args.qubits, Some(2));
        assert_eq!(args.run.seed, Some(3));
        assert_eq!(args.depth, 1);
    }

    #[test]
    fn test_parse_vqe_labels_with_negative_coefficients() {
        let cli = parse(&["vqe", "--labels", "ZZ,IZ", "--coefficients", "1,-0.5"]).unwrap();
        let Commands::Vqe(args) = cli.command else {
            panic!("expected vqe");
        };
        assert_eq!(args.labels, Some(vec!["ZZ".to_string(), "IZ".to_string()]));
        assert_eq!(args.coefficients, Some(vec![1.0, -0.5]));
    }

    #[test]
    fn test_parse_vqe_conflicting_inputs() {
        assert!(parse(&["vqe", "-e", "Z0", "--kind", "maxcut"]).is_err());
        assert!(parse(&["vqe", "--labels", "ZZ"]).is_err());
    }

    #[test]
    fn test_parse_qaoa() {
        let cli = parse(&[
            "-vv", "qaoa", "-t", "cycle", "-n", "6", "-p", "2", "--kind", "vertex-cover",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Qaoa(args) = cli.command else {
            panic!("expected qaoa");
        };
        assert_eq!(args.layers, 2);
        assert_eq!(args.kind, KindArg::VertexCover);
        assert_eq!(args.graph.topology.as_deref(), Some("cycle"));
        assert_eq!(args.graph.vertices, 6);
    }

    #[test]
    fn test_parse_walk_with_config() {
        let cli = parse(&[
            "walk", "-t", "star", "--start", "2", "--dt", "0.1", "--json", "-c", "hq.yaml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("hq.yaml")));
        let Commands::Walk(args) = cli.command else {
            panic!("expected walk");
        };
        assert_eq!(args.start, 2);
        assert_eq!(args.dt, Some(0.1));
        assert_eq!(args.steps, None);
        assert!(args.json);
    }

    #[test]
    fn test_parse_graph_adjacency_conflicts_with_topology() {
        assert!(parse(&["graph", "-a", "g.json", "-t", "cycle"]).is_err());
        assert!(parse(&["graph", "-a", "g.json"]).is_ok());
    }
}
