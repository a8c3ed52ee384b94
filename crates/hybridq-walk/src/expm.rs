//! Dense matrix exponentials.
//!
//! Scaling and squaring around a truncated Taylor series:
//! exp(M) = (exp(M / 2^s))^(2^s), with `s` chosen so that the scaled
//! matrix has norm at most 1/2.

use ndarray::Array2;
use num_complex::Complex64;

const MAX_TERMS: usize = 30;

/// Maximum absolute row sum.
fn norm_inf(m: &Array2<Complex64>) -> f64 {
    m.rows()
        .into_iter()
        .map(|row| row.iter().map(|z| z.norm()).sum::<f64>())
        .fold(0.0, f64::max)
}

/// exp(M) for a square complex matrix.
pub fn expm(m: &Array2<Complex64>) -> Array2<Complex64> {
    let n = m.nrows();
    let norm = norm_inf(m);
    if norm == 0.0 {
        return Array2::eye(n);
    }

    let mut squarings = 0_i32;
    while norm * 0.5_f64.powi(squarings) > 0.5 {
        squarings += 1;
    }
    // Multiplying keeps the factor nonzero for norms near f64::MAX.
    let factor = 0.5_f64.powi(squarings);
    let scaled = m.mapv(|z| z * factor);

    let mut result = Array2::<Complex64>::eye(n);
    let mut term = Array2::<Complex64>::eye(n);
    for k in 1..=MAX_TERMS {
        term = term.dot(&scaled).mapv(|z| z / k as f64);
        result += &term;
        if norm_inf(&term) < f64::EPSILON {
            break;
        }
    }

    for _ in 0..squarings {
        result = result.dot(&result);
    }
    result
}

/// exp(-i A t) for a real symmetric `a`.
pub fn evolution_operator(a: &Array2<f64>, t: f64) -> Array2<Complex64> {
    expm(&a.mapv(|w| Complex64::new(0.0, -w * t)))
}
