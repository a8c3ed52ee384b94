//! Ising problems and their operator form.
//!
//! H = Σ_{i<j} J_ij Z_i Z_j + Σ_i h_i Z_i
//!
//! Spins are read from basis states with bit value 0 as +1 and 1 as -1.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProblemError, ProblemResult};
use crate::graph::Adjacency;
use crate::operator::WeightedOperator;
use crate::pauli::{Pauli, PauliString};

/// Couplings `J` (read above the diagonal only) and optional fields `h`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsingProblem {
    num_qubits: usize,
    couplings: Vec<Vec<f64>>,
    fields: Option<Vec<f64>>,
}

impl IsingProblem {
    /// Strict constructor: `couplings` must be `num_qubits x num_qubits` and
    /// `fields`, when present, of length `num_qubits`.
    pub fn new(
        num_qubits: usize,
        couplings: Vec<Vec<f64>>,
        fields: Option<Vec<f64>>,
    ) -> ProblemResult<Self> {
        if num_qubits == 0 {
            return Err(ProblemError::Empty);
        }
        if couplings.len() != num_qubits {
            return Err(ProblemError::DimensionMismatch {
                what: "coupling matrix",
                expected: num_qubits,
                got: couplings.len(),
            });
        }
        for (row, r) in couplings.iter().enumerate() {
            if r.len() != num_qubits {
                return Err(ProblemError::NotSquare {
                    row,
                    len: r.len(),
                    expected: num_qubits,
                });
            }
        }
        if let Some(h) = &fields {
            if h.len() != num_qubits {
                return Err(ProblemError::DimensionMismatch {
                    what: "field vector",
                    expected: num_qubits,
                    got: h.len(),
                });
            }
        }
        Ok(Self {
            num_qubits,
            couplings,
            fields,
        })
    }

    /// Minimum vertex cover:
    /// H = Σ_{(i,j)∈E} ¾ (Z_i Z_j + Z_i + Z_j) − Σ_i Z_i.
    pub fn for_vertex_cover(adjacency: &Adjacency) -> Self {
        let n = adjacency.num_vertices();
        let mut j = vec![vec![0.0; n]; n];
        let mut h = vec![0.0; n];
        for (a, b, _) in adjacency.edges() {
            j[a][b] += 0.75;
            h[a] += 0.75;
            h[b] += 0.75;
        }
        for hi in &mut h {
            *hi -= 1.0;
        }
        Self {
            num_qubits: n,
            couplings: j,
            fields: Some(h),
        }
    }

    /// Weighted MaxCut: J_ij = −w_ij, no fields. Minimizing the operator
    /// maximizes the cut weight.
    pub fn for_weighted_maxcut(adjacency: &Adjacency) -> Self {
        let n = adjacency.num_vertices();
        let mut j = vec![vec![0.0; n]; n];
        for (a, b, w) in adjacency.edges() {
            j[a][b] = -w;
        }
        Self {
            num_qubits: n,
            couplings: j,
            fields: Some(vec![0.0; n]),
        }
    }

    /// Number of spins.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// J_ij for `i < j`; 0 on and below the diagonal and out of range.
    pub fn coupling(&self, i: usize, j: usize) -> f64 {
        if i >= j {
            return 0.0;
        }
        self.couplings
            .get(i)
            .and_then(|row| row.get(j))
            .copied()
            .unwrap_or(0.0)
    }

    /// h_i, or 0 when the problem has no fields or `i` is out of range.
    pub fn field(&self, i: usize) -> f64 {
        self.fields
            .as_ref()
            .and_then(|h| h.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    /// Nonzero couplings as `(i, j, J_ij)` with `i < j`, row-major.
    pub fn interactions(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let n = self.num_qubits;
        (0..n)
            .flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
            .filter_map(move |(i, j)| {
                let w = self.couplings[i][j];
                (w != 0.0).then_some((i, j, w))
            })
    }

    /// Nonzero fields as `(i, h_i)`.
    pub fn linear_terms(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.fields
            .iter()
            .flat_map(|h| h.iter().copied().enumerate())
            .filter(|(_, w)| *w != 0.0)
    }

    /// The weighted operator: ZZ terms first, then Z terms.
    pub fn to_operator(&self) -> WeightedOperator {
        let n = self.num_qubits;
        let mut terms = Vec::new();
        for (i, j, w) in self.interactions() {
            let pauli = PauliString::identity(n).with(i, Pauli::Z).with(j, Pauli::Z);
            terms.push((pauli, w));
        }
        for (i, w) in self.linear_terms() {
            terms.push((PauliString::identity(n).with(i, Pauli::Z), w));
        }
        debug!(num_qubits = n, n_terms = terms.len(), "built Ising operator");
        WeightedOperator::from_terms_unchecked(n, terms)
    }

    /// Classical energy of basis state `index` (bit q = spin of qubit q).
    pub fn energy(&self, index: usize) -> f64 {
        let spin = |q: usize| if (index >> q) & 1 == 0 { 1.0 } else { -1.0 };
        let zz: f64 = self
            .interactions()
            .map(|(i, j, w)| w * spin(i) * spin(j))
            .sum();
        let z: f64 = self.linear_terms().map(|(i, w)| w * spin(i)).sum();
        zz + z
    }

    /// Shot-averaged energy over measured bitstrings.
    ///
    /// Bitstrings are read with qubit 0 as the rightmost character; entries
    /// that are not binary are skipped. Returns `None` when no shots remain.
    pub fn expectation_from_counts<'a>(
        &self,
        counts: impl IntoIterator<Item = (&'a str, u64)>,
    ) -> Option<f64> {
        let mut total = 0u64;
        let mut acc = 0.0;
        for (bits, count) in counts {
            let Ok(index) = usize::from_str_radix(bits, 2) else {
                debug!(bits, "skipping non-binary outcome");
                continue;
            };
            acc += self.energy(index) * count as f64;
            total += count;
        }
        (total > 0).then(|| acc / total as f64)
    }
}

/// The problem families an adjacency matrix can be turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    /// Weighted MaxCut.
    MaxCut,
    /// Minimum vertex cover.
    VertexCover,
    /// Distance-based clustering on the inverted adjacency.
    Clustering,
}

impl ProblemKind {
    /// Operator for this problem on `adjacency`.
    pub fn operator(self, adjacency: &Adjacency) -> WeightedOperator {
        match self {
            ProblemKind::MaxCut => IsingProblem::for_weighted_maxcut(adjacency).to_operator(),
            ProblemKind::VertexCover => IsingProblem::for_vertex_cover(adjacency).to_operator(),
            ProblemKind::Clustering => distance_operator(adjacency, true),
        }
    }

    /// Ising form, where the family has one.
    pub fn ising(self, adjacency: &Adjacency) -> Option<IsingProblem> {
        match self {
            ProblemKind::MaxCut => Some(IsingProblem::for_weighted_maxcut(adjacency)),
            ProblemKind::VertexCover => Some(IsingProblem::for_vertex_cover(adjacency)),
            ProblemKind::Clustering => None,
        }
    }
}

/// ZZ operator over positive pair weights of `adjacency`, or of the distance
/// matrix `1 − A` when `invert` is set. The diagonal never contributes.
pub fn distance_operator(adjacency: &Adjacency, invert: bool) -> WeightedOperator {
    let n = adjacency.num_vertices();
    let mut terms = Vec::new();
    for i in 0..n {
        for j in i + 1..n {
            let a = adjacency.get(i, j);
            let w = if invert { 1.0 - a } else { a };
            if w > 0.0 {
                let pauli = PauliString::identity(n).with(i, Pauli::Z).with(j, Pauli::Z);
                terms.push((pauli, w));
            }
        }
    }
    debug!(num_vertices = n, invert, n_terms = terms.len(), "built distance operator");
    WeightedOperator::from_terms_unchecked(n, terms)
}
