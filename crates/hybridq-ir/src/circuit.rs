//! High-level circuit builder API.

use ndarray::Array2;
use num_complex::Complex64;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::angle::Angle;
use crate::error::{IrError, IrResult};
use crate::gate::{Gate, UnitaryGate};
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// A quantum circuit over a fixed register.
///
/// Instructions are validated on insertion: operands must be inside the
/// register, distinct, and match the gate's arity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Register width.
    num_qubits: u32,
    /// Instructions in application order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a circuit with a given number of qubits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            instructions: vec![],
        }
    }

    /// Append an instruction after validating its operands.
    pub fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        let gate_name = instruction.name();
        let expected = instruction.gate.num_qubits();
        if instruction.qubits.len() != expected {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate_name.into(),
                expected,
                got: instruction.qubits.len(),
            });
        }
        for (i, q) in instruction.qubits.iter().enumerate() {
            if q.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit: *q,
                    num_qubits: self.num_qubits,
                    gate_name: gate_name.into(),
                });
            }
            if instruction.qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    gate_name: gate_name.into(),
                });
            }
        }
        self.instructions.push(instruction);
        Ok(self)
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(Gate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(Gate::X, qubit))
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: impl Into<Angle>, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(Gate::Rx(theta.into()), qubit))
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: impl Into<Angle>, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(Gate::Ry(theta.into()), qubit))
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: impl Into<Angle>, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(Gate::Rz(theta.into()), qubit))
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit_gate(Gate::CX, control, target))
    }

    /// Apply a dense unitary to `qubits` (first operand = least-significant bit).
    pub fn unitary(
        &mut self,
        label: impl Into<String>,
        matrix: Array2<Complex64>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        let gate = UnitaryGate::new(label, matrix)?;
        self.push(Instruction::new(Gate::Unitary(Box::new(gate)), qubits))
    }

    /// Append every instruction of `other`, which must not be wider.
    pub fn compose(&mut self, other: &Circuit) -> IrResult<&mut Self> {
        for inst in &other.instructions {
            self.push(inst.clone())?;
        }
        Ok(self)
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Number of trainable parameters referenced (highest index + 1).
    pub fn num_parameters(&self) -> usize {
        self.instructions
            .iter()
            .filter_map(|inst| inst.gate.angle().and_then(Angle::parameter_index))
            .max()
            .map_or(0, |max| max + 1)
    }

    /// Whether every angle is concrete.
    pub fn is_bound(&self) -> bool {
        !self.instructions.iter().any(|inst| inst.gate.is_parametric())
    }

    /// Produce a concrete copy with every parametric angle resolved.
    pub fn bind(&self, params: &[f64]) -> IrResult<Circuit> {
        let instructions = self
            .instructions
            .iter()
            .map(|inst| inst.bind(params))
            .collect::<IrResult<Vec<_>>>()?;
        Ok(Circuit {
            name: self.name.clone(),
            num_qubits: self.num_qubits,
            instructions,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the circuit applies no gates, i.e. is the identity.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Get the circuit depth (longest chain of gates sharing qubits).
    pub fn depth(&self) -> usize {
        let mut level = vec![0usize; self.num_qubits()];
        for inst in &self.instructions {
            let next = inst
                .qubits
                .iter()
                .map(|q| level[q.index()])
                .max()
                .unwrap_or(0)
                + 1;
            for q in &inst.qubits {
                level[q.index()] = next;
            }
        }
        level.into_iter().max().unwrap_or(0)
    }

    /// Gate counts keyed by gate name.
    pub fn count_ops(&self) -> FxHashMap<&'static str, usize> {
        let mut counts = FxHashMap::default();
        for inst in &self.instructions {
            *counts.entry(inst.name()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_circuit_with_size() {
        let circuit = Circuit::with_size("test", 3);
        assert_eq!(circuit.num_qubits(), 3);
        assert!(circuit.is_empty());
        assert_eq!(circuit.depth(), 0);
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .rz(PI / 2.0, QubitId(1))
            .unwrap();

        assert_eq!(circuit.len(), 3);
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_parallel_gates_share_a_layer() {
        let mut circuit = Circuit::with_size("test", 3);
        for q in 0..3 {
            circuit.h(QubitId(q)).unwrap();
        }
        assert_eq!(circuit.depth(), 1);
        assert_eq!(circuit.count_ops()["h"], 3);
    }

    #[test]
    fn test_qubit_out_of_range() {
        let mut circuit = Circuit::with_size("test", 2);
        let err = circuit.x(QubitId(2)).unwrap_err();
        assert!(matches!(err, IrError::QubitOutOfRange { num_qubits: 2, .. }));
    }

    #[test]
    fn test_duplicate_qubit() {
        let mut circuit = Circuit::with_size("test", 2);
        let err = circuit.cx(QubitId(1), QubitId(1)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_unitary_arity_checked() {
        let mut circuit = Circuit::with_size("test", 2);
        let err = circuit
            .unitary("u", Array2::eye(4), [QubitId(0)])
            .unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitCountMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_bind_parameters() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit.ry(Angle::param(0), QubitId(0)).unwrap();
        circuit.ry(Angle::scaled(1, 2.0), QubitId(1)).unwrap();
        assert_eq!(circuit.num_parameters(), 2);
        assert!(!circuit.is_bound());

        let bound = circuit.bind(&[0.5, 0.25]).unwrap();
        assert!(bound.is_bound());
        assert_eq!(bound.instructions()[1].gate, Gate::Ry(Angle::Fixed(0.5)));

        assert!(circuit.bind(&[0.5]).is_err());
    }
}
