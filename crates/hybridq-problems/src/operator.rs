//! Weighted Pauli operators.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ProblemError, ProblemResult};
use crate::pauli::{MAX_QUBITS, PauliString};

/// A real linear combination of Pauli strings of equal width.
///
/// Never empty: an operator with no terms is represented as the identity
/// with coefficient 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedOperator {
    num_qubits: usize,
    terms: Vec<(PauliString, f64)>,
}

impl WeightedOperator {
    /// The zero operator (`I...I` with coefficient 0).
    pub fn zero(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            terms: vec![(PauliString::identity(num_qubits), 0.0)],
        }
    }

    /// Build from terms, falling back to [`zero`](Self::zero) when empty.
    ///
    /// Widths must already agree; strict constructors check this first.
    pub(crate) fn from_terms_unchecked(num_qubits: usize, terms: Vec<(PauliString, f64)>) -> Self {
        if terms.is_empty() {
            return Self::zero(num_qubits);
        }
        Self { num_qubits, terms }
    }

    /// Strict construction from parallel basis-string and coefficient lists.
    ///
    /// The qubit count is the width of the labels; every label must have the
    /// same width and only contain I, X, Y or Z.
    pub fn from_labels<S: AsRef<str>>(labels: &[S], coefficients: &[f64]) -> ProblemResult<Self> {
        if labels.len() != coefficients.len() {
            return Err(ProblemError::DimensionMismatch {
                what: "coefficient list",
                expected: labels.len(),
                got: coefficients.len(),
            });
        }
        let Some(first) = labels.first() else {
            return Err(ProblemError::Empty);
        };
        let num_qubits = first.as_ref().chars().count();
        if num_qubits == 0 {
            return Err(ProblemError::Empty);
        }
        if num_qubits > MAX_QUBITS {
            return Err(ProblemError::TooManyQubits {
                num_qubits,
                max: MAX_QUBITS,
            });
        }

        let mut terms = Vec::with_capacity(labels.len());
        for (term, (label, &coeff)) in labels.iter().zip(coefficients).enumerate() {
            let pauli = PauliString::from_label(label.as_ref())?;
            if pauli.num_qubits() != num_qubits {
                return Err(ProblemError::DimensionMismatch {
                    what: "basis string",
                    expected: num_qubits,
                    got: pauli.num_qubits(),
                });
            }
            if !coeff.is_finite() {
                return Err(ProblemError::NonFiniteCoefficient { term, value: coeff });
            }
            terms.push((pauli, coeff));
        }
        Ok(Self { num_qubits, terms })
    }

    /// Number of qubits the operator acts on.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Terms in insertion order.
    pub fn terms(&self) -> &[(PauliString, f64)] {
        &self.terms
    }

    /// Number of terms (at least 1).
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Basis-string labels in term order.
    pub fn labels(&self) -> Vec<String> {
        self.terms.iter().map(|(p, _)| p.to_string()).collect()
    }

    /// Coefficients in term order.
    pub fn coefficients(&self) -> Vec<f64> {
        self.terms.iter().map(|(_, c)| *c).collect()
    }

    /// Whether every coefficient is zero.
    pub fn is_zero(&self) -> bool {
        self.terms.iter().all(|(_, c)| *c == 0.0)
    }

    /// Whether every term is a product of I and Z.
    pub fn is_diagonal(&self) -> bool {
        self.terms.iter().all(|(p, _)| p.is_diagonal())
    }

    /// Energy of basis state `index` for a diagonal operator.
    ///
    /// Returns `None` if any term contains X or Y.
    pub fn diagonal_energy(&self, index: usize) -> Option<f64> {
        if !self.is_diagonal() {
            return None;
        }
        Some(
            self.terms
                .iter()
                .map(|(p, c)| c * p.z_parity(index))
                .sum(),
        )
    }
}

impl fmt::Display for WeightedOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (pauli, coeff)) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{coeff:.4} * {pauli}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pauli::Pauli;

    #[test]
    fn test_zero_operator() {
        let op = WeightedOperator::zero(3);
        assert_eq!(op.labels(), vec!["III".to_string()]);
        assert_eq!(op.coefficients(), vec![0.0]);
        assert!(op.is_zero());
    }

    #[test]
    fn test_from_labels() {
        let op = WeightedOperator::from_labels(&["ZZ", "ZI"], &[-1.0, -1.0]).unwrap();
        assert_eq!(op.num_qubits(), 2);
        assert_eq!(op.num_terms(), 2);
        assert_eq!(op.terms()[1].0.get(1), Pauli::Z);
        assert_eq!(op.terms()[1].0.get(0), Pauli::I);
    }

    #[test]
    fn test_from_labels_width_mismatch() {
        let err = WeightedOperator::from_labels(&["ZZ", "Z"], &[1.0, 1.0]).unwrap_err();
        assert!(matches!(
            err,
            ProblemError::DimensionMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_from_labels_count_mismatch() {
        assert!(WeightedOperator::from_labels(&["ZZ"], &[1.0, 2.0]).is_err());
        assert!(WeightedOperator::from_labels::<&str>(&[], &[]).is_err());
    }

    #[test]
    fn test_from_labels_rejects_nan() {
        let err = WeightedOperator::from_labels(&["Z"], &[f64::NAN]).unwrap_err();
        assert!(matches!(err, ProblemError::NonFiniteCoefficient { term: 0, .. }));
    }

    #[test]
    fn test_diagonal_energy() {
        let op = WeightedOperator::from_labels(&["ZZ", "IZ"], &[1.0, 0.5]).unwrap();
        // |00>: +1 + 0.5
        assert_eq!(op.diagonal_energy(0b00), Some(1.5));
        // |01> (qubit 0 set): -1 - 0.5
        assert_eq!(op.diagonal_energy(0b01), Some(-1.5));
        // |10>: -1 + 0.5
        assert_eq!(op.diagonal_energy(0b10), Some(-0.5));

        let x = WeightedOperator::from_labels(&["X"], &[1.0]).unwrap();
        assert_eq!(x.diagonal_energy(0), None);
    }

    #[test]
    fn test_from_labels_width_limit() {
        let too_wide = "Z".repeat(MAX_QUBITS + 1);
        let err = WeightedOperator::from_labels(&[too_wide.as_str()], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            ProblemError::TooManyQubits { num_qubits, max }
                if num_qubits == MAX_QUBITS + 1 && max == MAX_QUBITS
        ));

        // Leftmost letter is the highest qubit.
        let widest = format!("Z{}", "I".repeat(MAX_QUBITS - 1));
        let op = WeightedOperator::from_labels(&[widest.as_str()], &[1.0]).unwrap();
        assert_eq!(op.num_qubits(), MAX_QUBITS);
        assert_eq!(op.diagonal_energy(0), Some(1.0));
        assert_eq!(op.diagonal_energy(1 << (MAX_QUBITS - 1)), Some(-1.0));
    }
}
