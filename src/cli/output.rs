//! Output formatting for CLI commands.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::cli::args::{OutputFormat, SentixArgs};
use crate::cli::commands::RunOutcome;
use crate::dataset::record::Sentiment;
use crate::error::Result;
use crate::explain::Explanation;

const BAR_WIDTH: usize = 40;

/// Output a run outcome in the requested format.
pub fn output_outcome(outcome: &RunOutcome, args: &SentixArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => print!("{}", render_human(outcome, args.verbosity())),
        OutputFormat::Json => println!("{}", render_json(outcome, args.pretty)?),
    }
    Ok(())
}

/// Serialize the outcome as JSON.
pub fn render_json(outcome: &RunOutcome, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(outcome)?
    } else {
        serde_json::to_string(outcome)?
    };
    Ok(json)
}

/// Human-readable rendering. Verbosity 0 keeps only the results.
pub fn render_human(outcome: &RunOutcome, verbosity: u8) -> String {
    let mut out = String::new();

    if verbosity > 0 {
        let _ = writeln!(out, "Label distribution ({} records):", outcome.dataset.records);
        out.push_str(&distribution_bars(&outcome.dataset.label_counts));
        out.push('\n');
        let _ = writeln!(
            out,
            "Classification report ({} train / {} test):",
            outcome.train_size, outcome.test_size
        );
        out.push('\n');
    }
    let _ = writeln!(out, "{}", outcome.report);

    if let Some(prediction) = &outcome.prediction {
        let _ = writeln!(out, "Predicted sentiment: {}", prediction.label);
        if verbosity > 0 {
            for p in &prediction.probabilities {
                let _ = writeln!(out, "  {:<10} {:.4}", p.label.as_str(), p.probability);
            }
        }
    }

    for explanation in &outcome.explanations {
        out.push('\n');
        out.push_str(&render_explanation(explanation));
    }

    out
}

/// Counts per label with a proportional text bar.
pub fn distribution_bars(counts: &BTreeMap<Sentiment, usize>) -> String {
    let max = counts.values().copied().max().unwrap_or(0);
    let mut out = String::new();

    for (label, &count) in counts {
        let width = if max > 0 { count * BAR_WIDTH / max } else { 0 };
        let _ = writeln!(
            out,
            "  {:<10} {:>8}  {}",
            label.as_str(),
            count,
            "#".repeat(width.max(usize::from(count > 0)))
        );
    }
    out
}

fn render_explanation(explanation: &Explanation) -> String {
    let mut out = String::new();
    match explanation {
        #[cfg(feature = "lime")]
        Explanation::Lime(lime) => {
            if let Some(path) = &lime.report_path {
                let _ = writeln!(out, "LIME explanation saved at '{}'", path.display());
            }
            let _ = writeln!(out, "LIME top words (class {}):", lime.class);
            for w in &lime.weights {
                let _ = writeln!(out, "  {:<20} {:+.4}", w.word, w.weight);
            }
        }
        #[cfg(feature = "shap")]
        Explanation::Shap(shap) => {
            let _ = writeln!(out, "SHAP word importances:");
            let _ = writeln!(out, "{shap}");
        }
        #[allow(unreachable_patterns)]
        _ => {}
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::DatasetSummary;
    use crate::model::ClassificationReport;

    fn outcome() -> RunOutcome {
        let y = [Sentiment::Negative, Sentiment::Positive, Sentiment::Positive];
        RunOutcome {
            dataset: DatasetSummary {
                records: 15,
                label_counts: BTreeMap::from([
                    (Sentiment::Negative, 5),
                    (Sentiment::Neutral, 0),
                    (Sentiment::Positive, 10),
                ]),
            },
            train_size: 12,
            test_size: 3,
            report: ClassificationReport::compute(&y, &y).unwrap(),
            prediction: None,
            explanations: Vec::new(),
        }
    }

    #[test]
    fn test_distribution_bars() {
        let text = distribution_bars(&outcome().dataset.label_counts);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("negative"));
        assert!(lines[0].ends_with(&"#".repeat(20)));
        assert!(!lines[1].contains('#'));
        assert!(lines[2].ends_with(&"#".repeat(40)));
    }

    #[test]
    fn test_render_human() {
        let text = render_human(&outcome(), 1);

        assert!(text.contains("Label distribution (15 records)"));
        assert!(text.contains("12 train / 3 test"));
        assert!(text.contains("weighted avg"));
        assert!(!text.contains("Predicted sentiment"));

        let quiet = render_human(&outcome(), 0);
        assert!(!quiet.contains("Label distribution"));
        assert!(quiet.contains("accuracy"));
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&outcome(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["dataset"]["label_counts"]["positive"], 10);
        assert_eq!(value["test_size"], 3);
        assert!(value.get("prediction").is_none());
        assert!(render_json(&outcome(), true).unwrap().contains('\n'));
    }
}
