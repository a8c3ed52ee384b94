//! Rotation angles for parametrized circuits.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// A rotation angle: either a concrete value or `scale * params[index]`.
///
/// Scaled references let a single trainable scalar drive several gates with
/// different weights, e.g. the QAOA cost phase `2 * gamma * J_ij`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Angle {
    /// A concrete angle in radians.
    Fixed(f64),
    /// A reference into the trainable parameter vector.
    Param {
        /// Position in the parameter vector.
        index: usize,
        /// Multiplier applied to the parameter value.
        scale: f64,
    },
}

impl Angle {
    /// Unscaled reference to parameter `index`.
    pub fn param(index: usize) -> Self {
        Angle::Param { index, scale: 1.0 }
    }

    /// Reference to parameter `index` multiplied by `scale`.
    pub fn scaled(index: usize, scale: f64) -> Self {
        Angle::Param { index, scale }
    }

    /// Whether this angle still needs a parameter vector.
    pub fn is_parametric(&self) -> bool {
        matches!(self, Angle::Param { .. })
    }

    /// The concrete value, if already bound.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Angle::Fixed(v) => Some(*v),
            Angle::Param { .. } => None,
        }
    }

    /// The referenced parameter index, if any.
    pub fn parameter_index(&self) -> Option<usize> {
        match self {
            Angle::Fixed(_) => None,
            Angle::Param { index, .. } => Some(*index),
        }
    }

    /// Resolve against a parameter vector.
    pub fn resolve(&self, params: &[f64]) -> IrResult<f64> {
        match *self {
            Angle::Fixed(v) => Ok(v),
            Angle::Param { index, scale } => params
                .get(index)
                .map(|v| scale * v)
                .ok_or(IrError::UnboundParameter {
                    index,
                    available: params.len(),
                }),
        }
    }
}

impl From<f64> for Angle {
    fn from(value: f64) -> Self {
        Angle::Fixed(value)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Angle::Fixed(v) => write!(f, "{v}"),
            Angle::Param { index, scale } if (*scale - 1.0).abs() < f64::EPSILON => {
                write!(f, "p[{index}]")
            }
            Angle::Param { index, scale } => write!(f, "{scale}*p[{index}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_scaled() {
        let angle = Angle::scaled(1, 2.0);
        assert!((angle.resolve(&[0.0, 0.25]).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_resolve_missing_parameter() {
        let err = Angle::param(3).resolve(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            IrError::UnboundParameter {
                index: 3,
                available: 1
            }
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Angle::param(0).to_string(), "p[0]");
        assert_eq!(Angle::scaled(2, 0.5).to_string(), "0.5*p[2]");
        assert_eq!(Angle::from(1.5).to_string(), "1.5");
    }
}
