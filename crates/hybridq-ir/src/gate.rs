//! Quantum gate types.

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::angle::Angle;
use crate::error::{IrError, IrResult};

/// A dense unitary acting on `log2(dim)` qubits.
///
/// Row and column indices follow the same little-endian convention as the
/// statevector: bit `k` of an index is the k-th operand qubit of the
/// instruction carrying this gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitaryGate {
    /// Display label, e.g. `Walk(t=1.5)`.
    pub label: String,
    /// The matrix.
    pub matrix: Array2<Complex64>,
}

impl UnitaryGate {
    /// Wrap a matrix, checking that it is square with power-of-two size.
    pub fn new(label: impl Into<String>, matrix: Array2<Complex64>) -> IrResult<Self> {
        let label = label.into();
        let (rows, cols) = matrix.dim();
        if rows != cols || rows == 0 || !rows.is_power_of_two() {
            return Err(IrError::UnitaryShape { label, rows, cols });
        }
        Ok(Self { label, matrix })
    }

    /// Number of qubits the matrix acts on.
    pub fn num_qubits(&self) -> usize {
        self.matrix.nrows().trailing_zeros() as usize
    }
}

/// Gates understood by the circuit IR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Rotation around X axis.
    Rx(Angle),
    /// Rotation around Y axis.
    Ry(Angle),
    /// Rotation around Z axis.
    Rz(Angle),
    /// Controlled-X (CNOT) gate, operands `[control, target]`.
    CX,
    /// Dense unitary.
    Unitary(Box<UnitaryGate>),
}

impl Gate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Gate::H => "h",
            Gate::X => "x",
            Gate::Rx(_) => "rx",
            Gate::Ry(_) => "ry",
            Gate::Rz(_) => "rz",
            Gate::CX => "cx",
            Gate::Unitary(_) => "unitary",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        match self {
            Gate::H | Gate::X | Gate::Rx(_) | Gate::Ry(_) | Gate::Rz(_) => 1,
            Gate::CX => 2,
            Gate::Unitary(u) => u.num_qubits(),
        }
    }

    /// The rotation angle, for rotation gates.
    pub fn angle(&self) -> Option<&Angle> {
        match self {
            Gate::Rx(a) | Gate::Ry(a) | Gate::Rz(a) => Some(a),
            Gate::H | Gate::X | Gate::CX | Gate::Unitary(_) => None,
        }
    }

    /// Whether the gate's angle still references a parameter.
    pub fn is_parametric(&self) -> bool {
        self.angle().is_some_and(Angle::is_parametric)
    }

    /// Replace a parametric angle by its value under `params`.
    pub fn bind(&self, params: &[f64]) -> IrResult<Self> {
        Ok(match self {
            Gate::Rx(a) => Gate::Rx(Angle::Fixed(a.resolve(params)?)),
            Gate::Ry(a) => Gate::Ry(Angle::Fixed(a.resolve(params)?)),
            Gate::Rz(a) => Gate::Rz(Angle::Fixed(a.resolve(params)?)),
            other => other.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_unitary_shape_checked() {
        let ok = UnitaryGate::new("id4", Array2::eye(4));
        assert_eq!(ok.unwrap().num_qubits(), 2);

        let bad = UnitaryGate::new("bad", Array2::zeros((3, 3)));
        assert!(matches!(bad, Err(IrError::UnitaryShape { rows: 3, .. })));

        let rect = UnitaryGate::new("rect", Array2::zeros((2, 4)));
        assert!(rect.is_err());
    }

    #[test]
    fn test_bind_rotation() {
        let gate = Gate::Rz(Angle::scaled(0, 2.0));
        assert!(gate.is_parametric());
        let bound = gate.bind(&[0.75]).unwrap();
        assert_eq!(bound, Gate::Rz(Angle::Fixed(1.5)));
        assert!(!bound.is_parametric());
    }

    #[test]
    fn test_names() {
        assert_eq!(Gate::CX.name(), "cx");
        assert_eq!(Gate::Ry(Angle::param(0)).name(), "ry");
        assert_eq!(Gate::CX.num_qubits(), 2);
    }
}
