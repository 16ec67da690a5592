use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::analyze_to_string;
use crate::analysis::analyzer::Analyzer;
use crate::dataset::labeler::label;
use crate::error::{Result, SentixError};

/// Sentiment label derived from a transaction.
///
/// Variants are ordered alphabetically by name, which is also the class
/// order used by the classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// All labels in class order.
    pub const ALL: [Sentiment; 3] = [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive];

    /// Lowercase name of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Positive => "positive",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = SentixError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "negative" | "negativo" => Ok(Sentiment::Negative),
            "neutral" | "neutro" => Ok(Sentiment::Neutral),
            "positive" | "positivo" => Ok(Sentiment::Positive),
            other => Err(SentixError::input(format!("unknown sentiment label: {other}"))),
        }
    }
}

/// One transaction row with its derived label and cleaned text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Free-text product description, as read from the file.
    pub description: String,
    /// Ordered quantity; negative for returns.
    pub quantity: i64,
    /// Label derived from `quantity`.
    pub sentiment: Sentiment,
    /// Normalized description used for training.
    pub clean_text: String,
}

impl Record {
    /// Label the row and clean its description with `analyzer`.
    pub fn new(description: String, quantity: i64, analyzer: &dyn Analyzer) -> Result<Self> {
        let clean_text = analyze_to_string(analyzer, &description)?;
        Ok(Record {
            sentiment: label(quantity),
            description,
            quantity,
            clean_text,
        })
    }
}
