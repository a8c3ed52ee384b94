//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;

use hybridq_hal::{Counts, OracleResult, bitstring};
use hybridq_ir::{Angle, Gate, Instruction, UnitaryGate};
use hybridq_problems::{PauliString, WeightedOperator};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A statevector over `num_qubits` qubits, qubit 0 = least-significant bit.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![ZERO; size];
        amplitudes[0] = ONE;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes, indexed little-endian.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume the state, returning its amplitudes.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Apply a bound instruction.
    pub fn apply(&mut self, instruction: &Instruction) -> OracleResult<()> {
        let qubits: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();
        match &instruction.gate {
            Gate::H => self.apply_h(qubits[0]),
            Gate::X => self.apply_x(qubits[0]),
            Gate::Rx(theta) => self.apply_rx(qubits[0], resolve(theta)?),
            Gate::Ry(theta) => self.apply_ry(qubits[0], resolve(theta)?),
            Gate::Rz(theta) => self.apply_rz(qubits[0], resolve(theta)?),
            Gate::CX => self.apply_cx(qubits[0], qubits[1]),
            Gate::Unitary(u) => self.apply_unitary(u, &qubits),
        }
        Ok(())
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = std::f64::consts::FRAC_1_SQRT_2;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp *= if i & mask == 0 { phase_0 } else { phase_1 };
        }
    }

    // =========================================================================
    // Multi-qubit gate implementations
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    /// Dense k-qubit unitary; bit `b` of a matrix index is operand `qubits[b]`.
    fn apply_unitary(&mut self, gate: &UnitaryGate, qubits: &[usize]) {
        let dim = 1 << qubits.len();
        let operand_mask: usize = qubits.iter().map(|q| 1 << q).sum();
        let offsets: Vec<usize> = (0..dim)
            .map(|local| {
                qubits
                    .iter()
                    .enumerate()
                    .filter(|(b, _)| (local >> b) & 1 == 1)
                    .map(|(_, q)| 1 << q)
                    .sum()
            })
            .collect();

        let mut local = vec![ZERO; dim];
        for base in 0..self.amplitudes.len() {
            if base & operand_mask != 0 {
                continue;
            }
            for (slot, offset) in local.iter_mut().zip(&offsets) {
                *slot = self.amplitudes[base | offset];
            }
            for (row, offset) in offsets.iter().enumerate() {
                self.amplitudes[base | offset] = gate
                    .matrix
                    .row(row)
                    .iter()
                    .zip(&local)
                    .map(|(m, a)| m * a)
                    .sum();
            }
        }
    }

    // =========================================================================
    // Readout
    // =========================================================================

    /// Exact ⟨ψ|P|ψ⟩ for a single Pauli string.
    pub fn pauli_expectation(&self, pauli: &PauliString) -> f64 {
        let flip = pauli.flip_mask();
        let phase_mask = pauli.phase_mask();
        let global = match pauli.num_y() % 4 {
            0 => ONE,
            1 => Complex64::new(0.0, 1.0),
            2 => -ONE,
            _ => Complex64::new(0.0, -1.0),
        };
        let sum: Complex64 = self
            .amplitudes
            .iter()
            .enumerate()
            .map(|(i, amp)| {
                let sign = if (i & phase_mask).count_ones() % 2 == 0 {
                    1.0
                } else {
                    -1.0
                };
                self.amplitudes[i ^ flip].conj() * amp * sign
            })
            .sum();
        (global * sum).re
    }

    /// Exact ⟨ψ|H|ψ⟩.
    pub fn expectation(&self, operator: &WeightedOperator) -> f64 {
        operator
            .terms()
            .iter()
            .map(|(pauli, coeff)| coeff * self.pauli_expectation(pauli))
            .sum()
    }

    /// Born-rule probabilities.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Draw `shots` measurement outcomes of every qubit.
    pub fn sample<R: Rng + ?Sized>(&self, shots: u32, rng: &mut R) -> Counts {
        let cumulative: Vec<f64> = self
            .amplitudes
            .iter()
            .scan(0.0, |acc, amp| {
                *acc += amp.norm_sqr();
                Some(*acc)
            })
            .collect();
        let total = cumulative.last().copied().unwrap_or(0.0);
        let last = self.amplitudes.len() - 1;

        let mut counts = Counts::new();
        for _ in 0..shots {
            let r: f64 = rng.r#gen::<f64>() * total;
            let outcome = cumulative.partition_point(|&c| c <= r).min(last);
            counts.insert(bitstring(outcome, self.num_qubits), 1);
        }
        counts
    }
}

fn resolve(angle: &Angle) -> OracleResult<f64> {
    Ok(angle.resolve(&[])?)
}
