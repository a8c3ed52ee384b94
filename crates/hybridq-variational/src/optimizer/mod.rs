//! Gradient-free minimizers driven one evaluation at a time.
//!
//! The optimization loop owns the oracle; a minimizer only sees
//! `(params, cost)` pairs and answers with the next point to evaluate.

mod nelder_mead;

pub use nelder_mead::NelderMead;

/// Ask/tell interface for black-box minimizers.
pub trait Minimizer: Send {
    /// Report the cost of `params` (the point last proposed, or the starting
    /// point on the first call) and receive the next point to evaluate.
    fn step(&mut self, params: &[f64], cost: f64) -> Vec<f64>;

    /// Whether the convergence criterion has been met.
    fn converged(&self) -> bool;

    /// Parameters with the lowest cost reported so far.
    fn best_params(&self) -> Option<&[f64]>;

    /// Lowest cost reported so far.
    fn best_cost(&self) -> f64;

    /// Completed iterations of the underlying method.
    fn iterations(&self) -> usize;
}
