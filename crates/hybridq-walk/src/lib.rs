//! hybridq quantum walks
//!
//! Continuous-time quantum walks on weighted graphs. The adjacency matrix
//! is the Hamiltonian: ψ(t) = exp(-iAt)|v⟩. Vertex probabilities are traced
//! exactly, and the final state is sampled through any
//! [`ExpectationOracle`](hybridq_hal::ExpectationOracle) as a prepared
//! basis state followed by one dense unitary gate.
//!
//! ```ignore
//! use hybridq_adapter_sim::SimulatorBackend;
//! use hybridq_problems::Topology;
//! use hybridq_walk::{QuantumWalk, WalkConfig};
//!
//! let walk = QuantumWalk::new(Topology::Cycle.generate(6), 0)?;
//! let outcome = walk.run(&SimulatorBackend::with_seed(7), WalkConfig::default()).await?;
//! println!("most likely vertex: {}", outcome.most_likely_vertex);
//! ```

pub mod ctqw;
pub mod error;
pub mod expm;

pub use ctqw::{EvolutionTrace, FinalSample, QuantumWalk, Snapshot, WalkConfig, WalkOutcome};
pub use error::{WalkError, WalkResult};
pub use expm::{evolution_operator, expm};
