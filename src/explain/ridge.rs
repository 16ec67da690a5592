//! Weighted ridge regression for small dense problems.

use crate::error::{Result, SentixError};

/// A fitted linear model `y ≈ x · coef + intercept`.
#[derive(Debug, Clone, PartialEq)]
pub struct RidgeFit {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl RidgeFit {
    pub fn predict(&self, x: &[f64]) -> f64 {
        self.intercept + x.iter().zip(&self.coef).map(|(a, b)| a * b).sum::<f64>()
    }

    /// Weighted coefficient of determination on `(rows, y, weights)`.
    ///
    /// A constant target scores 1 when predicted exactly and 0 otherwise.
    pub fn score(&self, rows: &[Vec<f64>], y: &[f64], weights: &[f64]) -> f64 {
        let total: f64 = weights.iter().sum();
        let mean = weighted_mean(y.iter().copied(), weights, total);

        let mut residual = 0.0;
        let mut spread = 0.0;
        for ((row, &target), &w) in rows.iter().zip(y).zip(weights) {
            residual += w * (target - self.predict(row)).powi(2);
            spread += w * (target - mean).powi(2);
        }

        if spread == 0.0 {
            if residual == 0.0 { 1.0 } else { 0.0 }
        } else {
            1.0 - residual / spread
        }
    }
}

/// Fit `y` on `rows` minimizing `Σ w_i (y_i - x_i·β - b)² + alpha ‖β‖²`.
///
/// The intercept is not penalized: inputs and target are centered on their
/// weighted means before solving the normal equations.
pub fn fit_weighted_ridge(rows: &[Vec<f64>], y: &[f64], weights: &[f64], alpha: f64) -> Result<RidgeFit> {
    if rows.len() != y.len() || rows.len() != weights.len() {
        return Err(SentixError::explanation("ridge inputs have mismatched lengths"));
    }
    let total: f64 = weights.iter().sum();
    if rows.is_empty() || total <= 0.0 {
        return Err(SentixError::explanation("ridge needs samples with positive weight"));
    }

    let p = rows[0].len();
    let y_mean = weighted_mean(y.iter().copied(), weights, total);
    let x_mean: Vec<f64> = (0..p)
        .map(|j| weighted_mean(rows.iter().map(|r| r[j]), weights, total))
        .collect();

    let mut gram = vec![vec![0.0; p]; p];
    let mut rhs = vec![0.0; p];
    let mut centered = vec![0.0; p];
    for ((row, &target), &w) in rows.iter().zip(y).zip(weights) {
        for j in 0..p {
            centered[j] = row[j] - x_mean[j];
        }
        let yc = target - y_mean;
        for a in 0..p {
            rhs[a] += w * centered[a] * yc;
            for b in a..p {
                gram[a][b] += w * centered[a] * centered[b];
            }
        }
    }
    for a in 0..p {
        for b in 0..a {
            gram[a][b] = gram[b][a];
        }
        gram[a][a] += alpha;
    }

    let coef = solve(gram, rhs)?;
    let intercept = y_mean - coef.iter().zip(&x_mean).map(|(c, m)| c * m).sum::<f64>();

    Ok(RidgeFit { coef, intercept })
}

fn weighted_mean(values: impl Iterator<Item = f64>, weights: &[f64], total: f64) -> f64 {
    values.zip(weights).map(|(v, w)| v * w).sum::<f64>() / total
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-12 {
            return Err(SentixError::explanation("singular system in ridge regression"));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}
