//! Shared helpers for CLI commands.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use hybridq_adapter_sim::SimulatorBackend;
use hybridq_hal::Counts;
use hybridq_problems::{Adjacency, ProblemKind, Topology};

use crate::config::HybridqConfig;

/// Graph input: an adjacency file or a generated topology.
#[derive(Debug, Clone, Args)]
pub struct GraphArgs {
    /// Adjacency matrix file (JSON or YAML list of rows)
    #[arg(short, long, conflicts_with = "topology")]
    pub adjacency: Option<PathBuf>,

    /// Generated topology (cycle, path, complete, star, grid)
    #[arg(short, long)]
    pub topology: Option<String>,

    /// Number of vertices for a generated topology
    #[arg(short = 'n', long, default_value = "4")]
    pub vertices: usize,
}

impl GraphArgs {
    /// Whether any graph input was given.
    pub fn is_set(&self) -> bool {
        self.adjacency.is_some() || self.topology.is_some()
    }
}

/// Problem family built from a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Maxcut,
    VertexCover,
    Clustering,
}

impl From<KindArg> for ProblemKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Maxcut => ProblemKind::MaxCut,
            KindArg::VertexCover => ProblemKind::VertexCover,
            KindArg::Clustering => ProblemKind::Clustering,
        }
    }
}

/// Settings shared by the variational commands.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Maximum oracle evaluations
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Shots for the final sampling
    #[arg(short, long)]
    pub shots: Option<u32>,

    /// Seed for initial parameters
    #[arg(long)]
    pub seed: Option<u64>,

    /// Concurrent random restarts
    #[arg(long)]
    pub restarts: Option<usize>,

    /// Explicit initial parameters (comma separated)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub initial_params: Option<Vec<f64>>,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

/// Load an adjacency matrix from a JSON or YAML file.
pub fn load_adjacency(path: &Path) -> Result<Adjacency> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let rows: Vec<Vec<f64>> = match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&source)
            .with_context(|| format!("Invalid JSON adjacency: {}", path.display()))?,
        _ => serde_yaml_ng::from_str(&source)
            .with_context(|| format!("Invalid YAML adjacency: {}", path.display()))?,
    };

    Adjacency::from_rows(rows).with_context(|| format!("Invalid adjacency: {}", path.display()))
}

/// Resolve the graph arguments into an adjacency matrix.
pub fn resolve_graph(args: &GraphArgs) -> Result<Adjacency> {
    match (&args.adjacency, &args.topology) {
        (Some(path), _) => load_adjacency(path),
        (None, tag) => {
            let topology = Topology::from_tag(tag.as_deref().unwrap_or("path"));
            if args.vertices == 0 {
                anyhow::bail!("--vertices must be greater than 0");
            }
            Ok(topology.generate(args.vertices))
        }
    }
}

/// Local simulator configured from the `simulator` section.
pub fn simulator(config: &HybridqConfig) -> SimulatorBackend {
    let backend = match config.simulator.seed {
        Some(seed) => SimulatorBackend::with_seed(seed),
        None => SimulatorBackend::new(),
    };
    backend.with_max_qubits(config.simulator.max_qubits)
}

/// Spinner shown while a command works; hidden for JSON output.
pub fn spinner(message: &str, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Pretty-printed JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

/// Format a vector of floats compactly.
pub fn format_values(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:.4}")).collect();
    format!("[{}]", parts.join(", "))
}

/// Print measured counts as a histogram.
pub fn print_counts(counts: &Counts) {
    let total = counts.total_shots();
    println!(
        "\n{} Counts ({} shots):",
        style("✓").green().bold(),
        total
    );
    if total == 0 {
        println!("  (no outcomes)");
        return;
    }

    let sorted = counts.sorted();
    for (bitstring, count) in sorted.iter().take(16) {
        let prob = *count as f64 / total as f64 * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn graph(adjacency: Option<PathBuf>, topology: Option<&str>, vertices: usize) -> GraphArgs {
        GraphArgs {
            adjacency,
            topology: topology.map(String::from),
            vertices,
        }
    }

    #[test]
    fn test_load_adjacency_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "[[0, 2.5], [2.5, 0]]").unwrap();
        let adj = load_adjacency(file.path()).unwrap();
        assert_eq!(adj.num_vertices(), 2);
        assert_eq!(adj.get(0, 1), 2.5);
    }

    #[test]
    fn test_load_adjacency_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "- [0, 1, 0]\n- [1, 0, 1]\n- [0, 1, 0]").unwrap();
        let adj = load_adjacency(file.path()).unwrap();
        assert_eq!(adj.num_edges(), 2);
    }

    #[test]
    fn test_load_adjacency_asymmetric() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "[[0, 1], [0, 0]]").unwrap();
        assert!(load_adjacency(file.path()).is_err());
    }

    #[test]
    fn test_load_adjacency_missing() {
        let err = load_adjacency(Path::new("/nonexistent/graph.json")).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_resolve_topology() {
        let adj = resolve_graph(&graph(None, Some("star"), 5)).unwrap();
        assert_eq!(adj.num_edges(), 4);

        // Unknown tags fall back to a path.
        let adj = resolve_graph(&graph(None, Some("hypercube"), 5)).unwrap();
        assert_eq!(adj, Topology::Path.generate(5));
    }

    #[test]
    fn test_resolve_zero_vertices() {
        assert!(resolve_graph(&graph(None, Some("cycle"), 0)).is_err());
    }

    #[test]
    fn test_format_values() {
        assert_eq!(format_values(&[0.5, -1.25]), "[0.5000, -1.2500]");
        assert_eq!(format_values(&[]), "[]");
    }
}
