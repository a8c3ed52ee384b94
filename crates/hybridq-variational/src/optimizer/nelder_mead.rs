//! Nelder-Mead simplex minimizer.

use super::Minimizer;

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    /// Evaluating the initial simplex.
    InitialEval,
    /// Waiting for the reflected point.
    Reflection,
    /// Waiting for the expanded point.
    Expansion,
    /// Waiting for a contracted point.
    Contraction { inside: bool },
    /// Re-evaluating vertices after a shrink.
    Shrink,
}

/// Nelder-Mead simplex optimizer.
///
/// Uses a simplex of n+1 points in n dimensions and needs no gradients,
/// which suits noisy expectation values. Parameters are unbounded: angles
/// are periodic, so clamping would only distort the simplex.
#[derive(Debug, Clone)]
pub struct NelderMead {
    num_params: usize,
    tolerance: f64,
    initial_step: f64,
    /// Simplex vertices, best first once sorted.
    simplex: Vec<Vec<f64>>,
    simplex_costs: Vec<f64>,
    /// Vertex awaiting its cost during `InitialEval` and `Shrink`.
    eval_index: usize,
    phase: Phase,
    reflected: Vec<f64>,
    reflected_cost: f64,
    best_params: Option<Vec<f64>>,
    best_cost: f64,
    iterations: usize,
    converged: bool,
}

impl NelderMead {
    /// Create a minimizer for `num_params` parameters.
    pub fn new(num_params: usize) -> Self {
        Self {
            num_params,
            tolerance: 1e-6,
            initial_step: 0.5,
            simplex: Vec::new(),
            simplex_costs: Vec::new(),
            eval_index: 0,
            phase: Phase::InitialEval,
            reflected: Vec::new(),
            reflected_cost: f64::INFINITY,
            best_params: None,
            best_cost: f64::INFINITY,
            iterations: 0,
            converged: false,
        }
    }

    /// Set convergence tolerance on both cost spread and simplex size.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the initial simplex edge length.
    pub fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = step;
        self
    }

    fn init_simplex(&mut self, center: &[f64], cost: f64) {
        self.simplex = vec![center.to_vec()];
        self.simplex_costs = vec![cost];

        for i in 0..self.num_params {
            let mut vertex = center.to_vec();
            let delta = if center[i].abs() < 1e-10 {
                self.initial_step
            } else {
                self.initial_step * center[i].abs()
            };
            vertex[i] += delta;
            self.simplex.push(vertex);
            self.simplex_costs.push(f64::INFINITY);
        }

        self.eval_index = 1;
        self.phase = Phase::InitialEval;
    }

    fn sort_simplex(&mut self) {
        let mut order: Vec<usize> = (0..self.simplex.len()).collect();
        order.sort_by(|&a, &b| self.simplex_costs[a].total_cmp(&self.simplex_costs[b]));
        self.simplex = order.iter().map(|&i| self.simplex[i].clone()).collect();
        self.simplex_costs = order.iter().map(|&i| self.simplex_costs[i]).collect();
    }

    /// Centroid of every vertex except the worst.
    fn centroid(&self) -> Vec<f64> {
        let n = self.simplex.len() - 1;
        let mut center = vec![0.0; self.num_params];
        for vertex in &self.simplex[..n] {
            for (c, v) in center.iter_mut().zip(vertex) {
                *c += v;
            }
        }
        for c in &mut center {
            *c /= n as f64;
        }
        center
    }

    /// `centroid + coeff * (point - centroid)`.
    fn towards(centroid: &[f64], point: &[f64], coeff: f64) -> Vec<f64> {
        centroid
            .iter()
            .zip(point)
            .map(|(&c, &p)| c + coeff * (p - c))
            .collect()
    }

    fn check_convergence(&self) -> bool {
        let max = self
            .simplex_costs
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let min = self
            .simplex_costs
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        if max - min < self.tolerance {
            return true;
        }

        let size = self.simplex[1..]
            .iter()
            .map(|v| {
                self.simplex[0]
                    .iter()
                    .zip(v)
                    .map(|(a, b)| (a - b).powi(2))
                    .sum::<f64>()
                    .sqrt()
            })
            .fold(0.0, f64::max);
        size < self.tolerance
    }

    fn replace_worst(&mut self, point: Vec<f64>, cost: f64) {
        let worst = self.num_params;
        self.simplex[worst] = point;
        self.simplex_costs[worst] = cost;
    }

    /// Close an iteration: sort, test convergence, propose a reflection.
    fn next_iteration(&mut self) -> Vec<f64> {
        self.sort_simplex();
        self.iterations += 1;

        if self.check_convergence() {
            self.converged = true;
            return self.simplex[0].clone();
        }

        let centroid = self.centroid();
        self.phase = Phase::Reflection;
        Self::towards(&centroid, &self.simplex[self.num_params], -REFLECTION)
    }

    fn shrink(&mut self) -> Vec<f64> {
        let best = self.simplex[0].clone();
        for i in 1..self.simplex.len() {
            self.simplex[i] = Self::towards(&best, &self.simplex[i], SHRINK);
            self.simplex_costs[i] = f64::INFINITY;
        }
        self.phase = Phase::Shrink;
        self.eval_index = 1;
        self.simplex[1].clone()
    }
}

impl Minimizer for NelderMead {
    fn step(&mut self, params: &[f64], cost: f64) -> Vec<f64> {
        if cost < self.best_cost {
            self.best_cost = cost;
            self.best_params = Some(params.to_vec());
        }

        if self.simplex.is_empty() {
            self.init_simplex(params, cost);
            if self.num_params == 0 {
                self.converged = true;
                return params.to_vec();
            }
            return self.simplex[1].clone();
        }
        if self.converged {
            return self.simplex[0].clone();
        }

        let n = self.num_params;
        match self.phase {
            Phase::InitialEval | Phase::Shrink => {
                self.simplex_costs[self.eval_index] = cost;
                self.eval_index += 1;
                if self.eval_index < self.simplex.len() {
                    return self.simplex[self.eval_index].clone();
                }
                self.next_iteration()
            }

            Phase::Reflection => {
                let f_best = self.simplex_costs[0];
                let f_second_worst = self.simplex_costs[n - 1];
                let f_worst = self.simplex_costs[n];
                let centroid = self.centroid();

                if cost < f_best {
                    self.reflected = params.to_vec();
                    self.reflected_cost = cost;
                    self.phase = Phase::Expansion;
                    Self::towards(&centroid, params, EXPANSION)
                } else if cost < f_second_worst {
                    self.replace_worst(params.to_vec(), cost);
                    self.next_iteration()
                } else {
                    let inside = cost >= f_worst;
                    let target = if inside {
                        self.simplex[n].clone()
                    } else {
                        self.reflected = params.to_vec();
                        self.reflected_cost = cost;
                        params.to_vec()
                    };
                    self.phase = Phase::Contraction { inside };
                    Self::towards(&centroid, &target, CONTRACTION)
                }
            }

            Phase::Expansion => {
                if cost < self.reflected_cost {
                    self.replace_worst(params.to_vec(), cost);
                } else {
                    let reflected = std::mem::take(&mut self.reflected);
                    self.replace_worst(reflected, self.reflected_cost);
                }
                self.next_iteration()
            }

            Phase::Contraction { inside } => {
                let threshold = if inside {
                    self.simplex_costs[n]
                } else {
                    self.reflected_cost
                };
                if cost <= threshold {
                    self.replace_worst(params.to_vec(), cost);
                    self.next_iteration()
                } else {
                    self.shrink()
                }
            }
        }
    }

    fn converged(&self) -> bool {
        self.converged
    }

    fn best_params(&self) -> Option<&[f64]> {
        self.best_params.as_deref()
    }

    fn best_cost(&self) -> f64 {
        self.best_cost
    }

    fn iterations(&self) -> usize {
        self.iterations
    }
}
