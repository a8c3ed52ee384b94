//! Graph adjacency matrices and standard topologies.

use ndarray::Array2;
use petgraph::graph::UnGraph;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ProblemError, ProblemResult};

/// Standard graph families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Ring: i ~ i+1 mod n.
    Cycle,
    /// Line: i ~ i+1.
    Path,
    /// All pairs.
    Complete,
    /// Vertex 0 joined to every other vertex.
    Star,
    /// Row-major square grid of side ⌈√n⌉.
    Grid,
}

impl Topology {
    /// Map a tag to a topology; unknown tags fall back to [`Topology::Path`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "cycle" | "ring" => Topology::Cycle,
            "path" | "line" => Topology::Path,
            "complete" => Topology::Complete,
            "star" => Topology::Star,
            "grid" => Topology::Grid,
            other => {
                tracing::debug!(tag = other, "unknown topology, using path");
                Topology::Path
            }
        }
    }

    /// The canonical tag.
    pub fn name(self) -> &'static str {
        match self {
            Topology::Cycle => "cycle",
            Topology::Path => "path",
            Topology::Complete => "complete",
            Topology::Star => "star",
            Topology::Grid => "grid",
        }
    }

    /// Generate the adjacency matrix on `n` vertices.
    pub fn generate(self, n: usize) -> Adjacency {
        let mut a = Array2::<f64>::zeros((n, n));
        let mut connect = |i: usize, j: usize| {
            if i != j {
                a[[i, j]] = 1.0;
                a[[j, i]] = 1.0;
            }
        };
        match self {
            Topology::Cycle => {
                for i in 0..n {
                    connect(i, (i + 1) % n);
                }
            }
            Topology::Path => {
                for i in 1..n {
                    connect(i - 1, i);
                }
            }
            Topology::Complete => {
                for i in 0..n {
                    for j in i + 1..n {
                        connect(i, j);
                    }
                }
            }
            Topology::Star => {
                for i in 1..n {
                    connect(0, i);
                }
            }
            Topology::Grid => {
                let side = grid_side(n);
                for i in 0..n {
                    let c = i % side;
                    if c + 1 < side && i + 1 < n {
                        connect(i, i + 1);
                    }
                    if i + side < n {
                        connect(i, i + side);
                    }
                }
            }
        }
        Adjacency { matrix: a }
    }
}

/// ⌈√n⌉ computed in integers.
fn grid_side(n: usize) -> usize {
    let mut side = (n as f64).sqrt() as usize;
    while side * side < n {
        side += 1;
    }
    side.max(1)
}

impl FromStr for Topology {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Topology::from_tag(s))
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A symmetric weighted adjacency matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjacency {
    matrix: Array2<f64>,
}

impl Adjacency {
    /// Strict construction from rows: non-empty, square and symmetric.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> ProblemResult<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(ProblemError::Empty);
        }
        let mut matrix = Array2::<f64>::zeros((n, n));
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(ProblemError::NotSquare {
                    row: i,
                    len: row.len(),
                    expected: n,
                });
            }
            for (j, v) in row.iter().enumerate() {
                matrix[[i, j]] = *v;
            }
        }
        Self::from_array(matrix)
    }

    /// Strict construction from an `ndarray` matrix.
    pub fn from_array(matrix: Array2<f64>) -> ProblemResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(ProblemError::NotSquare {
                row: 0,
                len: cols,
                expected: rows,
            });
        }
        for i in 0..rows {
            for j in i + 1..rows {
                let (a, b) = (matrix[[i, j]], matrix[[j, i]]);
                if (a - b).abs() > 1e-12 {
                    return Err(ProblemError::NotSymmetric { i, j, a, b });
                }
            }
        }
        Ok(Self { matrix })
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.matrix.nrows()
    }

    /// Entry (i, j).
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix[[i, j]]
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Rows as nested vectors.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.matrix.outer_iter().map(|r| r.to_vec()).collect()
    }

    /// Edges `(i, j, w)` with `i < j` and `w != 0`, row-major.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let n = self.num_vertices();
        (0..n)
            .flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
            .filter_map(move |(i, j)| {
                let w = self.matrix[[i, j]];
                (w != 0.0).then_some((i, j, w))
            })
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges().count()
    }

    /// As an undirected `petgraph` graph; node weights are vertex indices.
    pub fn to_graph(&self) -> UnGraph<usize, f64> {
        let mut graph = UnGraph::with_capacity(self.num_vertices(), self.num_edges());
        let nodes: Vec<_> = (0..self.num_vertices()).map(|v| graph.add_node(v)).collect();
        for (i, j, w) in self.edges() {
            graph.add_edge(nodes[i], nodes[j], w);
        }
        graph
    }

    /// Whether every vertex can reach every other.
    pub fn is_connected(&self) -> bool {
        petgraph::algo::connected_components(&self.to_graph()) <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn degree(adj: &Adjacency, v: usize) -> usize {
        (0..adj.num_vertices()).filter(|&u| adj.get(v, u) != 0.0).count()
    }

    #[test]
    fn test_cycle() {
        let adj = Topology::Cycle.generate(5);
        assert_eq!(adj.num_edges(), 5);
        assert!((0..5).all(|v| degree(&adj, v) == 2));
        assert_eq!(adj.get(4, 0), 1.0);
    }

    #[test]
    fn test_path_and_star() {
        let path = Topology::Path.generate(4);
        assert_eq!(path.num_edges(), 3);
        assert_eq!(path.get(0, 3), 0.0);

        let star = Topology::Star.generate(5);
        assert_eq!(degree(&star, 0), 4);
        assert!((1..5).all(|v| degree(&star, v) == 1));
    }

    #[test]
    fn test_complete() {
        let adj = Topology::Complete.generate(4);
        assert_eq!(adj.num_edges(), 6);
        assert!((0..4).all(|v| adj.get(v, v) == 0.0));
    }

    #[test]
    fn test_grid_partial_last_row() {
        // side = 3; vertices 0..5 laid out as
        // 0 1 2
        // 3 4
        let adj = Topology::Grid.generate(5);
        let edges: Vec<_> = adj.edges().map(|(i, j, _)| (i, j)).collect();
        assert_eq!(edges, vec![(0, 1), (0, 3), (1, 2), (1, 4), (3, 4)]);
    }

    #[test]
    fn test_grid_square() {
        let adj = Topology::Grid.generate(4);
        let edges: Vec<_> = adj.edges().map(|(i, j, _)| (i, j)).collect();
        assert_eq!(edges, vec![(0, 1), (0, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_unknown_tag_falls_back_to_path() {
        assert_eq!(Topology::from_tag("hypercube"), Topology::Path);
        assert_eq!(Topology::from_tag("GRID"), Topology::Grid);
        assert_eq!(
            Topology::from_tag("hypercube").generate(4),
            Topology::Path.generate(4)
        );
    }

    #[test]
    fn test_small_graphs() {
        assert_eq!(Topology::Cycle.generate(1).num_edges(), 0);
        assert_eq!(Topology::Cycle.generate(2).num_edges(), 1);
        assert_eq!(Topology::Grid.generate(0).num_vertices(), 0);
    }

    #[test]
    fn test_from_rows_validation() {
        assert!(matches!(
            Adjacency::from_rows(vec![vec![0.0, 1.0], vec![0.0, 0.0]]),
            Err(ProblemError::NotSymmetric { i: 0, j: 1, .. })
        ));
        assert!(matches!(
            Adjacency::from_rows(vec![vec![0.0, 1.0], vec![1.0]]),
            Err(ProblemError::NotSquare { row: 1, .. })
        ));
        assert!(matches!(
            Adjacency::from_rows(vec![]),
            Err(ProblemError::Empty)
        ));
    }

    #[test]
    fn test_connectivity() {
        assert!(Topology::Grid.generate(7).is_connected());
        let split = Adjacency::from_rows(vec![
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ])
        .unwrap();
        assert!(!split.is_connected());
    }
}
