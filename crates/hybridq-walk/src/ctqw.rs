//! Continuous-time quantum walk engine.
//!
//! A graph on V vertices is embedded in ⌈log2 V⌉ qubits (at least one).
//! Vertex `v` is basis state `|v⟩`, and the adjacency matrix is zero-padded
//! to the full register dimension, so padding states are never reached.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use hybridq_hal::{Counts, ExpectationOracle, bitstring, bounded};
use hybridq_ir::{Circuit, QubitId};
use hybridq_problems::Adjacency;

use crate::error::{WalkError, WalkResult};
use crate::expm::evolution_operator;

/// Vertex probabilities at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Time, rounded to 4 decimals.
    pub time: f64,
    /// Probability of each vertex, padding excluded.
    pub probabilities: Vec<f64>,
}

/// Measured distribution of the final walk state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalSample {
    /// Counts over real vertices only.
    pub counts: Counts,
    /// Bitstring of the most frequent vertex.
    pub most_likely_state: String,
    /// Index of the most frequent vertex.
    pub most_likely_vertex: usize,
}

/// Settings for a complete walk run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Snapshots are taken at `k * dt` for `k = 0..=num_steps`.
    pub num_steps: usize,
    /// Time between snapshots.
    pub dt: f64,
    /// Shots for the final sampling.
    pub shots: u32,
    /// Limit on the final sampling call.
    pub timeout: Duration,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            num_steps: 10,
            dt: 0.5,
            shots: 1024,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Result of [`QuantumWalk::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkOutcome {
    /// Probability snapshots in time order.
    pub probability_evolution: Vec<Snapshot>,
    /// Filtered counts at `num_steps * dt`.
    pub final_counts: Counts,
    /// Most frequently measured vertex.
    pub most_likely_vertex: usize,
    /// Its bitstring.
    pub most_likely_state: String,
    /// Graph size.
    pub num_vertices: usize,
    /// Register width.
    pub num_qubits: usize,
    /// Number of time steps.
    pub num_steps: usize,
    /// Time between snapshots.
    pub dt: f64,
    /// Start vertex.
    pub initial_vertex: usize,
}

/// Round to 4 decimals for reporting.
fn round_time(t: f64) -> f64 {
    (t * 1e4).round() / 1e4
}

fn check_finite(what: &'static str, value: f64) -> WalkResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(WalkError::InvalidTime { what, value })
    }
}

/// A walk on a fixed graph from a fixed start vertex.
#[derive(Debug, Clone)]
pub struct QuantumWalk {
    adjacency: Adjacency,
    padded: Array2<f64>,
    initial_vertex: usize,
    num_qubits: usize,
}

impl QuantumWalk {
    /// Prepare a walk starting at `initial_vertex`.
    pub fn new(adjacency: Adjacency, initial_vertex: usize) -> WalkResult<Self> {
        let v = adjacency.num_vertices();
        if initial_vertex >= v {
            return Err(WalkError::InvalidVertex {
                vertex: initial_vertex,
                num_vertices: v,
            });
        }
        let num_qubits = (v.next_power_of_two().trailing_zeros() as usize).max(1);
        let dim = 1 << num_qubits;

        let mut padded = Array2::<f64>::zeros((dim, dim));
        padded
            .slice_mut(ndarray::s![..v, ..v])
            .assign(adjacency.matrix());

        debug!(num_vertices = v, num_qubits, "prepared quantum walk");
        Ok(Self {
            adjacency,
            padded,
            initial_vertex,
            num_qubits,
        })
    }

    /// Graph size V.
    pub fn num_vertices(&self) -> usize {
        self.adjacency.num_vertices()
    }

    /// Register width ⌈log2 V⌉, at least 1.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Register dimension 2^num_qubits.
    pub fn dimension(&self) -> usize {
        self.padded.nrows()
    }

    /// Start vertex.
    pub fn initial_vertex(&self) -> usize {
        self.initial_vertex
    }

    /// Rejects times whose phase `‖A‖·t` is not representable.
    fn check_time(&self, t: f64) -> WalkResult<()> {
        check_finite("time", t)?;
        let norm = self
            .padded
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|w| w.abs()).sum::<f64>())
            .fold(0.0, f64::max);
        check_finite("time", norm * t.abs()).map_err(|_| WalkError::InvalidTime {
            what: "time",
            value: t,
        })
    }

    /// ψ(t) = exp(-iAt)|v⟩ over the full padded register.
    pub fn state_at(&self, t: f64) -> WalkResult<Vec<Complex64>> {
        self.check_time(t)?;
        let u = evolution_operator(&self.padded, t);
        Ok(u.column(self.initial_vertex).to_vec())
    }

    /// |ψ(t)|² over the padded register, padding included.
    pub fn register_probabilities(&self, t: f64) -> WalkResult<Vec<f64>> {
        Ok(self.state_at(t)?.iter().map(|a| a.norm_sqr()).collect())
    }

    /// |ψ(t)|² over the real vertices.
    pub fn probability_at(&self, t: f64) -> WalkResult<Vec<f64>> {
        let mut probs = self.register_probabilities(t)?;
        probs.truncate(self.num_vertices());
        Ok(probs)
    }

    fn snapshot(&self, step: usize, dt: f64) -> WalkResult<Snapshot> {
        let t = step as f64 * dt;
        Ok(Snapshot {
            time: round_time(t),
            probabilities: self.probability_at(t)?,
        })
    }

    /// Lazy snapshots at `k * dt` for `k = 0..=num_steps`.
    ///
    /// Each snapshot is propagated from t = 0. The iterator can be cloned to
    /// restart it.
    pub fn evolution_trace(&self, num_steps: usize, dt: f64) -> EvolutionTrace<'_> {
        EvolutionTrace {
            walk: self,
            dt,
            next: 0,
            end: num_steps + 1,
        }
    }

    /// The same snapshots as [`evolution_trace`](Self::evolution_trace),
    /// computed on the blocking thread pool.
    pub async fn evolution_trace_parallel(
        &self,
        num_steps: usize,
        dt: f64,
    ) -> WalkResult<Vec<Snapshot>> {
        check_finite("dt", dt)?;
        let shared = Arc::new(self.clone());
        let tasks = (0..=num_steps).map(|k| {
            let walk = Arc::clone(&shared);
            tokio::task::spawn_blocking(move || walk.snapshot(k, dt))
        });

        join_all(tasks)
            .await
            .into_iter()
            .map(|joined| {
                joined
                    .map_err(|e| WalkError::Join(e.to_string()))
                    .and_then(|snapshot| snapshot)
            })
            .collect()
    }

    /// Bound circuit preparing |v⟩ and applying exp(-iA·T).
    pub fn circuit(&self, final_time: f64) -> WalkResult<Circuit> {
        self.check_time(final_time)?;
        let mut circuit = Circuit::with_size("ctqw", self.num_qubits as u32);
        for q in 0..self.num_qubits {
            if (self.initial_vertex >> q) & 1 == 1 {
                circuit.x(QubitId(q as u32))?;
            }
        }
        circuit.unitary(
            format!("Walk(t={final_time})"),
            evolution_operator(&self.padded, final_time),
            (0..self.num_qubits as u32).map(QubitId),
        )?;
        Ok(circuit)
    }

    /// Sample the walk state at `final_time` through `oracle`.
    ///
    /// Outcomes on padding states are discarded, not renormalized. When
    /// nothing survives the most likely state defaults to all zeros. A
    /// sample call running past `timeout` fails with
    /// [`OracleError::Timeout`](hybridq_hal::OracleError::Timeout).
    #[instrument(skip(self, oracle), fields(oracle = oracle.name()))]
    pub async fn final_state_sampling(
        &self,
        oracle: &dyn ExpectationOracle,
        final_time: f64,
        shots: u32,
        timeout: Duration,
    ) -> WalkResult<FinalSample> {
        let circuit = self.circuit(final_time)?;
        let mut counts = bounded(timeout, oracle.sample(&circuit, shots)).await?;

        let v = self.num_vertices();
        counts.retain(|state, count| {
            let keep = usize::from_str_radix(state, 2).is_ok_and(|idx| idx < v);
            if !keep {
                debug!(state, count, "dropping padding outcome");
            }
            keep
        });

        let (most_likely_state, most_likely_vertex) = match counts.most_frequent() {
            Some((state, _)) => (
                state.to_string(),
                usize::from_str_radix(state, 2).unwrap_or(0),
            ),
            None => (bitstring(0, self.num_qubits), 0),
        };

        Ok(FinalSample {
            counts,
            most_likely_state,
            most_likely_vertex,
        })
    }

    /// Snapshots plus final sampling at `num_steps * dt`.
    pub async fn run(
        &self,
        oracle: &dyn ExpectationOracle,
        config: WalkConfig,
    ) -> WalkResult<WalkOutcome> {
        info!(
            num_vertices = self.num_vertices(),
            initial_vertex = self.initial_vertex,
            num_steps = config.num_steps,
            dt = config.dt,
            "running quantum walk"
        );
        let probability_evolution = self
            .evolution_trace_parallel(config.num_steps, config.dt)
            .await?;
        let final_time = config.num_steps as f64 * config.dt;
        let sample = self
            .final_state_sampling(oracle, final_time, config.shots, config.timeout)
            .await?;

        Ok(WalkOutcome {
            probability_evolution,
            final_counts: sample.counts,
            most_likely_vertex: sample.most_likely_vertex,
            most_likely_state: sample.most_likely_state,
            num_vertices: self.num_vertices(),
            num_qubits: self.num_qubits,
            num_steps: config.num_steps,
            dt: config.dt,
            initial_vertex: self.initial_vertex,
        })
    }
}

/// Iterator returned by [`QuantumWalk::evolution_trace`].
#[derive(Debug, Clone)]
pub struct EvolutionTrace<'a> {
    walk: &'a QuantumWalk,
    dt: f64,
    next: usize,
    end: usize,
}

impl Iterator for EvolutionTrace<'_> {
    type Item = WalkResult<Snapshot>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let snapshot = self.walk.snapshot(self.next, self.dt);
        self.next += 1;
        Some(snapshot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.end - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for EvolutionTrace<'_> {}
