//! Classification metrics.
//!
//! Per-class precision, recall, F1 and support, overall accuracy, and macro
//! and support-weighted averages. Ratios with a zero denominator are 0.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::{Result, SentixError};

/// Metrics for one class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// An averaged row of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Held-out evaluation of a classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
}

impl ClassificationReport {
    /// Compare predictions with the true labels.
    ///
    /// The report lists every label that occurs in either slice, in sorted
    /// order.
    pub fn compute<L>(y_true: &[L], y_pred: &[L]) -> Result<Self>
    where
        L: Ord + Copy + fmt::Display,
    {
        if y_true.len() != y_pred.len() {
            return Err(SentixError::model(format!(
                "found {} true labels but {} predictions",
                y_true.len(),
                y_pred.len()
            )));
        }
        if y_true.is_empty() {
            return Err(SentixError::model("cannot evaluate on zero samples"));
        }

        let labels: BTreeSet<L> = y_true.iter().chain(y_pred).copied().collect();
        let total = y_true.len();

        let mut classes = Vec::with_capacity(labels.len());
        for label in labels {
            let mut tp = 0usize;
            let mut predicted = 0usize;
            let mut support = 0usize;
            for (t, p) in y_true.iter().zip(y_pred) {
                let is_true = *t == label;
                let is_pred = *p == label;
                if is_true {
                    support += 1;
                }
                if is_pred {
                    predicted += 1;
                }
                if is_true && is_pred {
                    tp += 1;
                }
            }

            let precision = ratio(tp, predicted);
            let recall = ratio(tp, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            classes.push(ClassMetrics {
                label: label.to_string(),
                precision,
                recall,
                f1,
                support,
            });
        }

        let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
        let accuracy = ratio(correct, total);

        let k = classes.len() as f64;
        let macro_avg = AverageMetrics {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / k,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / k,
            f1: classes.iter().map(|c| c.f1).sum::<f64>() / k,
            support: total,
        };

        let weight = |c: &ClassMetrics| c.support as f64 / total as f64;
        let weighted_avg = AverageMetrics {
            precision: classes.iter().map(|c| c.precision * weight(c)).sum(),
            recall: classes.iter().map(|c| c.recall * weight(c)).sum(),
            f1: classes.iter().map(|c| c.f1 * weight(c)).sum(),
            support: total,
        };

        Ok(ClassificationReport {
            classes,
            accuracy,
            macro_avg,
            weighted_avg,
        })
    }

    /// Metrics of the class named `label`.
    pub fn class(&self, label: &str) -> Option<&ClassMetrics> {
        self.classes.iter().find(|c| c.label == label)
    }

    /// Number of evaluated samples.
    pub fn support(&self) -> usize {
        self.macro_avg.support
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const WEIGHTED: &str = "weighted avg";
        let width = self
            .classes
            .iter()
            .map(|c| c.label.chars().count())
            .max()
            .unwrap_or(0)
            .max(WEIGHTED.len());

        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for c in &self.classes {
            writeln!(
                f,
                "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                c.label, c.precision, c.recall, c.f1, c.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.support()
        )?;
        for (name, avg) in [("macro avg", &self.macro_avg), (WEIGHTED, &self.weighted_avg)] {
            writeln!(
                f,
                "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, avg.precision, avg.recall, avg.f1, avg.support
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_per_class_metrics() {
        let y_true = ["neg", "neg", "neu", "pos", "pos", "pos"];
        let y_pred = ["neg", "neu", "neu", "pos", "pos", "neg"];
        let report = ClassificationReport::compute(&y_true, &y_pred).unwrap();

        let neg = report.class("neg").unwrap();
        assert!(approx(neg.precision, 0.5));
        assert!(approx(neg.recall, 0.5));
        assert_eq!(neg.support, 2);

        let pos = report.class("pos").unwrap();
        assert!(approx(pos.precision, 1.0));
        assert!(approx(pos.recall, 2.0 / 3.0));
        assert!(approx(pos.f1, 0.8));

        assert!(approx(report.accuracy, 4.0 / 6.0));
        assert_eq!(report.support(), 6);
    }

    #[test]
    fn test_averages() {
        let y_true = ["a", "a", "a", "b"];
        let y_pred = ["a", "a", "a", "a"];
        let report = ClassificationReport::compute(&y_true, &y_pred).unwrap();

        let a = report.class("a").unwrap();
        let b = report.class("b").unwrap();
        assert!(approx(b.precision, 0.0));
        assert!(approx(b.f1, 0.0));

        assert!(approx(report.macro_avg.recall, 0.5));
        assert!(approx(report.weighted_avg.recall, 0.75));
        assert!(approx(report.macro_avg.precision, a.precision / 2.0));
    }

    #[test]
    fn test_label_only_predicted_is_listed() {
        let report = ClassificationReport::compute(&["a", "a"], &["a", "z"]).unwrap();
        let z = report.class("z").unwrap();

        assert_eq!(z.support, 0);
        assert!(approx(z.recall, 0.0));
    }

    #[test]
    fn test_errors() {
        assert!(ClassificationReport::compute(&["a"], &["a", "b"]).is_err());
        assert!(ClassificationReport::compute::<&str>(&[], &[]).is_err());
    }

    #[test]
    fn test_display_layout() {
        let report = ClassificationReport::compute(&["neg", "pos"], &["neg", "pos"]).unwrap();
        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].contains("precision"));
        assert!(lines[0].ends_with("support"));
        assert!(lines[2].trim_start().starts_with("neg"));
        assert!(lines[2].contains("1.00"));
        assert!(text.contains("    accuracy"));
        assert!(text.contains("weighted avg"));
        assert_eq!(lines[2].len(), lines[0].len());
    }
}
