//! Limited-memory BFGS minimizer.
//!
//! Unconstrained minimization of a smooth objective given as a closure that
//! returns the value and writes the gradient. Steps are chosen by
//! backtracking until the Armijo sufficient-decrease condition holds.

use std::collections::VecDeque;

/// Stopping rules and memory size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LbfgsOptions {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Stop when the largest gradient component is at most this value.
    pub gtol: f64,
    /// Stop when the relative decrease of the objective is at most this value.
    pub ftol: f64,
    /// Number of correction pairs kept.
    pub memory: usize,
    /// Maximum number of halvings per line search.
    pub max_line_search: usize,
}

impl Default for LbfgsOptions {
    fn default() -> Self {
        LbfgsOptions {
            max_iter: 200,
            gtol: 1e-5,
            ftol: 64.0 * f64::EPSILON,
            memory: 10,
            max_line_search: 50,
        }
    }
}

/// Outcome of a minimization.
#[derive(Debug, Clone)]
pub struct LbfgsResult {
    /// Final point.
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub value: f64,
    /// Iterations performed.
    pub n_iter: usize,
    /// Whether a stopping tolerance was met before `max_iter`.
    pub converged: bool,
}

const ARMIJO_C1: f64 = 1e-4;

/// Minimize `objective` starting from `x0`.
pub fn minimize<F>(mut objective: F, x0: Vec<f64>, options: &LbfgsOptions) -> LbfgsResult
where
    F: FnMut(&[f64], &mut [f64]) -> f64,
{
    let n = x0.len();
    let mut x = x0;
    let mut grad = vec![0.0; n];
    let mut value = objective(&x, &mut grad);

    let mut history: VecDeque<(Vec<f64>, Vec<f64>, f64)> = VecDeque::with_capacity(options.memory);
    let mut x_new = vec![0.0; n];
    let mut grad_new = vec![0.0; n];
    let mut n_iter = 0;
    let mut converged = false;

    while n_iter < options.max_iter {
        if inf_norm(&grad) <= options.gtol {
            converged = true;
            break;
        }

        let mut direction = search_direction(&grad, &history);
        let mut slope = dot(&grad, &direction);
        if slope >= 0.0 {
            // Not a descent direction: restart from steepest descent.
            history.clear();
            direction = search_direction(&grad, &history);
            slope = dot(&grad, &direction);
        }

        let mut step = 1.0;
        let mut accepted = None;
        for _ in 0..options.max_line_search {
            for i in 0..n {
                x_new[i] = x[i] + step * direction[i];
            }
            let candidate = objective(&x_new, &mut grad_new);
            if candidate.is_finite() && candidate <= value + ARMIJO_C1 * step * slope {
                accepted = Some(candidate);
                break;
            }
            step *= 0.5;
        }

        let Some(value_new) = accepted else {
            break;
        };
        n_iter += 1;

        let s: Vec<f64> = x_new.iter().zip(&x).map(|(a, b)| a - b).collect();
        let y: Vec<f64> = grad_new.iter().zip(&grad).map(|(a, b)| a - b).collect();
        let sy = dot(&s, &y);
        if sy > 1e-10 {
            if history.len() == options.memory {
                history.pop_front();
            }
            history.push_back((s, y, 1.0 / sy));
        }

        let decrease = value - value_new;
        let scale = value.abs().max(value_new.abs()).max(1.0);
        std::mem::swap(&mut x, &mut x_new);
        std::mem::swap(&mut grad, &mut grad_new);
        value = value_new;

        if decrease <= options.ftol * scale {
            converged = true;
            break;
        }
    }

    if !converged && n_iter < options.max_iter && inf_norm(&grad) <= options.gtol {
        converged = true;
    }

    LbfgsResult {
        x,
        value,
        n_iter,
        converged,
    }
}

/// Two-loop recursion: approximate `-H * grad` from the stored pairs.
fn search_direction(grad: &[f64], history: &VecDeque<(Vec<f64>, Vec<f64>, f64)>) -> Vec<f64> {
    let mut q = grad.to_vec();
    let mut alphas = Vec::with_capacity(history.len());

    for (s, y, rho) in history.iter().rev() {
        let alpha = rho * dot(s, &q);
        axpy(-alpha, y, &mut q);
        alphas.push(alpha);
    }

    let gamma = match history.back() {
        Some((s, y, _)) => dot(s, y) / dot(y, y),
        None => 1.0 / dot(grad, grad).sqrt().max(1.0),
    };
    for v in &mut q {
        *v *= gamma;
    }

    for ((s, y, rho), alpha) in history.iter().zip(alphas.iter().rev()) {
        let beta = rho * dot(y, &q);
        axpy(alpha - beta, s, &mut q);
    }

    for v in &mut q {
        *v = -*v;
    }
    q
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += alpha * xi;
    }
}

fn inf_norm(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |m, x| m.max(x.abs()))
}
