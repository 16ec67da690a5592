//! Multinomial logistic regression.
//!
//! Softmax model over sparse inputs, fitted by L-BFGS on
//! `C * Σ -log p(y_i | x_i) + ½‖W‖²`. Intercepts are not penalized.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentixError};
use crate::model::lbfgs::{self, LbfgsOptions};
use crate::model::sparse::SparseVector;

/// Regularization and stopping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticConfig {
    /// Inverse of the L2 regularization strength.
    pub c: f64,
    /// Maximum number of optimizer iterations.
    pub max_iter: usize,
    /// Gradient tolerance, relative to the mean loss.
    pub tol: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        LogisticConfig {
            c: 1.0,
            max_iter: 200,
            tol: 1e-4,
        }
    }
}

/// A fitted multinomial logistic regression model.
///
/// Classes are the integers `0..n_classes`; mapping them to labels is left
/// to the caller.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// One coefficient row per class.
    coef: Vec<Vec<f64>>,
    /// One intercept per class.
    intercept: Vec<f64>,
    n_iter: usize,
    converged: bool,
}

impl LogisticRegression {
    /// Fit on sparse rows `x` with class targets `y`.
    pub fn fit(
        x: &[SparseVector],
        y: &[usize],
        n_classes: usize,
        n_features: usize,
        config: &LogisticConfig,
    ) -> Result<Self> {
        if x.len() != y.len() {
            return Err(SentixError::model(format!(
                "found {} samples but {} targets",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(SentixError::model("cannot fit on zero samples"));
        }
        if config.c <= 0.0 || !config.c.is_finite() {
            return Err(SentixError::model(format!(
                "C must be a positive number, got {}",
                config.c
            )));
        }
        if let Some(&bad) = y.iter().find(|&&t| t >= n_classes) {
            return Err(SentixError::model(format!(
                "target {bad} is out of range for {n_classes} classes"
            )));
        }
        let mut present = vec![false; n_classes];
        for &t in y {
            present[t] = true;
        }
        if present.iter().filter(|&&p| p).count() < 2 {
            return Err(SentixError::model(
                "training data needs samples of at least two classes",
            ));
        }
        if let Some(row) = x.iter().find(|row| row.indices().iter().any(|&i| i >= n_features)) {
            return Err(SentixError::model(format!(
                "sample has feature index {} but the model has {n_features} features",
                row.indices().last().copied().unwrap_or_default()
            )));
        }

        let stride = n_features + 1;
        let c = config.c;
        let objective = |theta: &[f64], grad: &mut [f64]| -> f64 {
            grad.fill(0.0);
            let mut z = vec![0.0; n_classes];
            let mut loss = 0.0;

            for (row, &target) in x.iter().zip(y) {
                for (k, zk) in z.iter_mut().enumerate() {
                    let params = &theta[k * stride..(k + 1) * stride];
                    *zk = row.dot(&params[..n_features]) + params[n_features];
                }
                let lse = log_sum_exp(&z);
                loss += lse - z[target];

                for (k, &zk) in z.iter().enumerate() {
                    let indicator = if k == target { 1.0 } else { 0.0 };
                    let residual = c * ((zk - lse).exp() - indicator);
                    let base = k * stride;
                    for (j, v) in row.iter() {
                        grad[base + j] += residual * v;
                    }
                    grad[base + n_features] += residual;
                }
            }

            loss *= c;
            for k in 0..n_classes {
                let base = k * stride;
                for j in 0..n_features {
                    let w = theta[base + j];
                    loss += 0.5 * w * w;
                    grad[base + j] += w;
                }
            }
            loss
        };

        let options = LbfgsOptions {
            max_iter: config.max_iter,
            gtol: config.tol * c * x.len() as f64,
            ..LbfgsOptions::default()
        };
        let result = lbfgs::minimize(objective, vec![0.0; n_classes * stride], &options);

        if result.converged {
            debug!(
                "Logistic regression converged after {} iterations (loss {:.6})",
                result.n_iter, result.value
            );
        } else {
            warn!(
                "Logistic regression stopped after {} iterations without converging; consider raising max_iter",
                result.n_iter
            );
        }

        let mut coef = Vec::with_capacity(n_classes);
        let mut intercept = Vec::with_capacity(n_classes);
        for params in result.x.chunks(stride) {
            coef.push(params[..n_features].to_vec());
            intercept.push(params[n_features]);
        }

        Ok(LogisticRegression {
            coef,
            intercept,
            n_iter: result.n_iter,
            converged: result.converged,
        })
    }

    /// Per-class scores `w_k · x + b_k`.
    pub fn decision_function(&self, x: &SparseVector) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(w, b)| x.dot(w) + b)
            .collect()
    }

    /// Class probabilities.
    pub fn predict_proba(&self, x: &SparseVector) -> Vec<f64> {
        softmax(&self.decision_function(x))
    }

    /// Most probable class. Ties go to the lowest class index.
    pub fn predict(&self, x: &SparseVector) -> usize {
        argmax(&self.decision_function(x))
    }

    /// Coefficient rows, one per class.
    pub fn coef(&self) -> &[Vec<f64>] {
        &self.coef
    }

    /// Intercepts, one per class.
    pub fn intercept(&self) -> &[f64] {
        &self.intercept
    }

    pub fn n_classes(&self) -> usize {
        self.coef.len()
    }

    pub fn n_features(&self) -> usize {
        self.coef.first().map_or(0, Vec::len)
    }

    /// Optimizer iterations used by the fit.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    pub fn converged(&self) -> bool {
        self.converged
    }
}

/// Numerically stable `ln Σ exp(z)`.
pub fn log_sum_exp(z: &[f64]) -> f64 {
    let max = z.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    max + z.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}

/// Normalized exponentials of `z`.
pub fn softmax(z: &[f64]) -> Vec<f64> {
    let lse = log_sum_exp(z);
    z.iter().map(|v| (v - lse).exp()).collect()
}

/// Index of the largest value, first one on ties.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}
