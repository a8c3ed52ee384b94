//! Pauli letters and fixed-width basis strings.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ProblemError, ProblemResult};

/// Widest basis string whose qubit masks fit a `usize`.
pub const MAX_QUBITS: usize = usize::BITS as usize;

/// A single Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Identity operator.
    I,
    /// Pauli-X operator.
    X,
    /// Pauli-Y operator.
    Y,
    /// Pauli-Z operator.
    Z,
}

impl Pauli {
    /// Parse a letter, case-insensitively.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'I' => Some(Pauli::I),
            'X' => Some(Pauli::X),
            'Y' => Some(Pauli::Y),
            'Z' => Some(Pauli::Z),
            _ => None,
        }
    }

    /// The upper-case letter.
    pub fn as_char(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }

    /// Whether the operator is diagonal in the computational basis.
    pub fn is_diagonal(self) -> bool {
        matches!(self, Pauli::I | Pauli::Z)
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A tensor product of Paulis, one per qubit.
///
/// Stored by qubit index; the textual label is written with qubit 0 as the
/// rightmost character, so `"ZI"` is Z on qubit 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PauliString {
    ops: Vec<Pauli>,
}

impl PauliString {
    /// Identity on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> Self {
        Self {
            ops: vec![Pauli::I; num_qubits],
        }
    }

    /// Parse a label such as `"IZZ"`.
    pub fn from_label(label: &str) -> ProblemResult<Self> {
        let ops = label
            .chars()
            .rev()
            .map(|c| {
                Pauli::from_char(c).ok_or_else(|| ProblemError::InvalidPauli {
                    symbol: c,
                    label: label.to_string(),
                })
            })
            .collect::<ProblemResult<Vec<_>>>()?;
        Ok(Self { ops })
    }

    /// Builder: set the operator on `qubit`. Out-of-range qubits are ignored.
    pub fn with(mut self, qubit: usize, pauli: Pauli) -> Self {
        if let Some(slot) = self.ops.get_mut(qubit) {
            *slot = pauli;
        }
        self
    }

    /// String width.
    pub fn num_qubits(&self) -> usize {
        self.ops.len()
    }

    /// Operator acting on `qubit`.
    pub fn get(&self, qubit: usize) -> Pauli {
        self.ops.get(qubit).copied().unwrap_or(Pauli::I)
    }

    /// Non-identity factors as `(qubit, pauli)`, lowest qubit first.
    pub fn factors(&self) -> impl Iterator<Item = (usize, Pauli)> + '_ {
        self.ops
            .iter()
            .enumerate()
            .filter(|(_, p)| **p != Pauli::I)
            .map(|(q, p)| (q, *p))
    }

    /// Whether every factor is I.
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(|p| *p == Pauli::I)
    }

    /// Whether the string contains only I and Z.
    pub fn is_diagonal(&self) -> bool {
        self.ops.iter().all(|p| p.is_diagonal())
    }

    /// Bit mask of qubits carrying X or Y.
    pub fn flip_mask(&self) -> usize {
        self.mask(|p| matches!(p, Pauli::X | Pauli::Y))
    }

    /// Bit mask of qubits carrying Y or Z.
    pub fn phase_mask(&self) -> usize {
        self.mask(|p| matches!(p, Pauli::Y | Pauli::Z))
    }

    /// Number of Y factors.
    pub fn num_y(&self) -> usize {
        self.ops.iter().filter(|p| **p == Pauli::Y).count()
    }

    /// Eigenvalue (+1/-1) of a diagonal string on basis state `index`.
    pub fn z_parity(&self, index: usize) -> f64 {
        if (index & self.phase_mask()).count_ones() % 2 == 0 {
            1.0
        } else {
            -1.0
        }
    }

    /// Qubits at or past [`MAX_QUBITS`] do not fit and are left out.
    fn mask(&self, pred: impl Fn(Pauli) -> bool) -> usize {
        self.ops
            .iter()
            .enumerate()
            .filter(|(_, p)| pred(**p))
            .fold(0, |m, (q, _)| {
                m | u32::try_from(q)
                    .ok()
                    .and_then(|q| 1_usize.checked_shl(q))
                    .unwrap_or(0)
            })
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in self.ops.iter().rev() {
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_is_little_endian() {
        let s = PauliString::from_label("XIZ").unwrap();
        assert_eq!(s.get(0), Pauli::Z);
        assert_eq!(s.get(1), Pauli::I);
        assert_eq!(s.get(2), Pauli::X);
        assert_eq!(s.to_string(), "XIZ");
    }

    #[test]
    fn test_with_builds_label() {
        let s = PauliString::identity(3).with(0, Pauli::Z).with(2, Pauli::Z);
        assert_eq!(s.to_string(), "ZIZ");
        assert_eq!(s.factors().collect::<Vec<_>>(), vec![(0, Pauli::Z), (2, Pauli::Z)]);
    }

    #[test]
    fn test_invalid_symbol() {
        let err = PauliString::from_label("ZQ").unwrap_err();
        assert!(matches!(err, ProblemError::InvalidPauli { symbol: 'Q', .. }));
    }

    #[test]
    fn test_masks() {
        let s = PauliString::from_label("YZX").unwrap();
        assert_eq!(s.flip_mask(), 0b101);
        assert_eq!(s.phase_mask(), 0b110);
        assert_eq!(s.num_y(), 1);
        assert!(!s.is_diagonal());
    }

    #[test]
    fn test_masks_past_usize_width() {
        let wide = PauliString::from_label(&format!("X{}Z", "I".repeat(MAX_QUBITS))).unwrap();
        assert_eq!(wide.num_qubits(), MAX_QUBITS + 2);
        assert_eq!(wide.flip_mask(), 0);
        assert_eq!(wide.phase_mask(), 1);
    }

    #[test]
    fn test_z_parity() {
        let zz = PauliString::from_label("ZZ").unwrap();
        assert_eq!(zz.z_parity(0b00), 1.0);
        assert_eq!(zz.z_parity(0b01), -1.0);
        assert_eq!(zz.z_parity(0b11), 1.0);
    }
}
