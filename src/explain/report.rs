//! Standalone HTML report for a LIME explanation.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{Result, SentixError};
use crate::explain::lime::{IndexedText, LimeExplanation};

/// Render `explanation` as a self-contained HTML page.
pub fn render_lime_html(explanation: &LimeExplanation) -> String {
    let mut html = String::new();
    let max_weight = explanation
        .weights
        .iter()
        .map(|w| w.weight.abs())
        .fold(0.0, f64::max);

    // Writing to a String cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"pt\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>LIME explanation</title>\n<style>\n\
         body {{ font-family: sans-serif; margin: 2em; }}\n\
         table {{ border-collapse: collapse; }}\n\
         td, th {{ padding: 4px 10px; text-align: left; }}\n\
         .bar {{ display: inline-block; height: 12px; }}\n\
         .pos {{ background: #4caf50; }}\n\
         .neg {{ background: #e53935; }}\n\
         mark.pos {{ background: #c8e6c9; }}\n\
         mark.neg {{ background: #ffcdd2; }}\n\
         </style>\n</head>\n<body>\n"
    );

    let _ = writeln!(html, "<h1>Prediction: {}</h1>", escape(explanation.predicted.as_str()));

    html.push_str("<h2>Prediction probabilities</h2>\n<table>\n");
    for (label, p) in &explanation.probabilities {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{:.3}</td><td><span class=\"bar pos\" style=\"width: {:.0}px\"></span></td></tr>",
            escape(label.as_str()),
            p,
            p * 200.0
        );
    }
    html.push_str("</table>\n");

    let _ = writeln!(
        html,
        "<h2>Words for class {}</h2>\n<table>",
        escape(explanation.class.as_str())
    );
    for w in &explanation.weights {
        let class = if w.weight >= 0.0 { "pos" } else { "neg" };
        let width = if max_weight > 0.0 {
            w.weight.abs() / max_weight * 200.0
        } else {
            0.0
        };
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{:+.4}</td><td><span class=\"bar {class}\" style=\"width: {width:.0}px\"></span></td></tr>",
            escape(&w.word),
            w.weight
        );
    }
    html.push_str("</table>\n");

    html.push_str("<h2>Text with highlighted words</h2>\n<p>");
    html.push_str(&highlight(explanation));
    html.push_str("</p>\n");

    let _ = writeln!(
        html,
        "<p><small>Surrogate intercept {:.4}, R² {:.4}, local prediction {:.4}</small></p>",
        explanation.intercept, explanation.score, explanation.local_prediction
    );
    html.push_str("</body>\n</html>\n");
    html
}

/// Write the report for `explanation` to `path`.
pub fn write_lime_report(path: &Path, explanation: &LimeExplanation) -> Result<()> {
    fs::write(path, render_lime_html(explanation)).map_err(|e| {
        SentixError::explanation(format!(
            "failed to write LIME report to {}: {e}",
            path.display()
        ))
    })
}

/// The explained text with selected words wrapped in `<mark>`.
///
/// Words are found the same way the explainer finds its features.
fn highlight(explanation: &LimeExplanation) -> String {
    let Ok(indexed) = IndexedText::new(&explanation.text) else {
        return escape(&explanation.text);
    };

    let mut out = String::new();
    for (piece, word) in indexed.pieces() {
        let weight = word.and_then(|word| explanation.weights.iter().find(|w| w.word == word));
        match weight {
            Some(w) => {
                let class = if w.weight >= 0.0 { "pos" } else { "neg" };
                let _ = write!(out, "<mark class=\"{class}\">{}</mark>", escape(piece));
            }
            None => out.push_str(&escape(piece)),
        }
    }
    out
}

/// Escape text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
