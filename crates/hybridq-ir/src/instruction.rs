//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::error::IrResult;
use crate::gate::Gate;
use crate::qubit::QubitId;

/// A gate applied to an ordered list of qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The gate.
    pub gate: Gate,
    /// Operand qubits, in the gate's operand order.
    pub qubits: Vec<QubitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn new(gate: Gate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            gate,
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: Gate, qubit: QubitId) -> Self {
        Self::new(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: Gate, q1: QubitId, q2: QubitId) -> Self {
        Self::new(gate, [q1, q2])
    }

    /// Get the name of the instruction's gate.
    pub fn name(&self) -> &'static str {
        self.gate.name()
    }

    /// Copy of this instruction with its angle resolved.
    pub fn bind(&self, params: &[f64]) -> IrResult<Self> {
        Ok(Self {
            gate: self.gate.bind(params)?,
            qubits: self.qubits.clone(),
        })
    }
}
