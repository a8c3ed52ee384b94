//! Graph command implementation.

use anyhow::Result;
use clap::Args;
use console::style;
use serde::Serialize;

use hybridq_problems::Adjacency;

use super::common::{GraphArgs, print_json, resolve_graph};

/// Arguments of `hybridq graph`.
#[derive(Debug, Clone, Args)]
pub struct GraphCommandArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct GraphSummary {
    num_vertices: usize,
    num_edges: usize,
    connected: bool,
    adjacency: Vec<Vec<f64>>,
}

impl From<&Adjacency> for GraphSummary {
    fn from(adjacency: &Adjacency) -> Self {
        Self {
            num_vertices: adjacency.num_vertices(),
            num_edges: adjacency.num_edges(),
            connected: adjacency.is_connected(),
            adjacency: adjacency.to_rows(),
        }
    }
}

/// Execute the graph command.
pub async fn execute(args: &GraphCommandArgs) -> Result<()> {
    let adjacency = resolve_graph(&args.graph)?;
    let summary = GraphSummary::from(&adjacency);

    if args.json {
        return print_json(&summary);
    }

    println!(
        "{} {} vertices, {} edges",
        style("→").cyan().bold(),
        style(summary.num_vertices).green(),
        summary.num_edges
    );
    if !summary.connected {
        println!(
            "  {} graph is not connected",
            style("warning:").yellow().bold()
        );
    }
    for row in &summary.adjacency {
        let cells: Vec<String> = row.iter().map(|w| format!("{w:>4}")).collect();
        println!("  {}", cells.join(" "));
    }
    for (i, j, w) in adjacency.edges() {
        println!("  {i} -- {j}  ({w})");
    }
    Ok(())
}
