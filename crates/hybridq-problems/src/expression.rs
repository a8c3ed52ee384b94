//! Best-effort parsing of free-text Hamiltonian expressions.
//!
//! Accepted shape: terms separated by `+`, each term an optional coefficient
//! followed by Pauli factors such as `Z0`, `x12`. The coefficient is either
//! the text before the first `*` or the first whitespace-separated token.
//!
//! ```text
//! Z0 Z1 + 0.5 * X0 + -1.2 Y2
//! ```
//!
//! Parsing never fails. Unreadable coefficients default to 1.0, factors
//! naming a qubit outside the register are dropped, and input without any
//! term yields the zero operator.

use logos::Logos;
use tracing::warn;

use crate::operator::WeightedOperator;
use crate::pauli::{Pauli, PauliString};

/// A Pauli letter immediately followed by a qubit index.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum Factor {
    #[regex(r"[XYZxyz][0-9]+", parse_factor)]
    Op((Pauli, usize)),
}

fn parse_factor(lex: &mut logos::Lexer<'_, Factor>) -> Option<(Pauli, usize)> {
    let slice = lex.slice();
    let pauli = Pauli::from_char(slice.chars().next()?)?;
    let index = slice[1..].parse().ok()?;
    Some((pauli, index))
}

/// Parse `text` into an operator on `num_qubits` qubits.
pub fn parse_expression(text: &str, num_qubits: usize) -> WeightedOperator {
    let mut terms = Vec::new();

    for raw in text.split('+') {
        let term = raw.trim();
        if term.is_empty() {
            continue;
        }
        let (coeff, pauli_part) = split_coefficient(term);

        let mut pauli = PauliString::identity(num_qubits);
        for (pos, token) in Factor::lexer(pauli_part).enumerate() {
            match token {
                Ok(Factor::Op((p, idx))) if idx < num_qubits => {
                    pauli = pauli.with(idx, p);
                }
                Ok(Factor::Op((p, idx))) => {
                    warn!(pauli = %p, qubit = idx, num_qubits, "dropping out-of-range factor");
                }
                Err(()) => {
                    tracing::trace!(term, pos, "skipping unrecognised input");
                }
            }
        }
        terms.push((pauli, coeff));
    }

    if terms.is_empty() {
        warn!(text, "expression has no terms, using zero operator");
    }
    WeightedOperator::from_terms_unchecked(num_qubits, terms)
}

/// Split a term into coefficient and factor text.
fn split_coefficient(term: &str) -> (f64, &str) {
    if let Some((head, tail)) = term.split_once('*') {
        return match parse_coefficient(head) {
            Some(c) => (c, tail.split('*').next().unwrap_or("").trim()),
            None => (1.0, term),
        };
    }

    let mut parts = term.splitn(2, char::is_whitespace);
    let head = parts.next().unwrap_or("");
    match parse_coefficient(head) {
        Some(c) => (c, parts.next().unwrap_or("").trim()),
        None => (1.0, term),
    }
}

fn parse_coefficient(text: &str) -> Option<f64> {
    let value: f64 = text.trim().parse().ok()?;
    if value.is_finite() {
        Some(value)
    } else {
        warn!(coefficient = value, "ignoring non-finite coefficient");
        None
    }
}
