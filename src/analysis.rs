//! Text analysis for Sentix.
//!
//! Raw text flows through an [`Analyzer`](analyzer::Analyzer): char filters
//! rewrite the string, a tokenizer splits it into [`Token`](token::Token)s and
//! token filters transform the stream.
//!
//! ```text
//! Raw Text → Char Filters → Tokenizer → Lowercase → Stop Words → Stemmer
//! ```
//!
//! Two analyzers are assembled from these parts:
//!
//! - [`PortugueseAnalyzer`](analyzer::portuguese::PortugueseAnalyzer) cleans
//!   free text for training (punctuation removal, stopwords, RSLP stemming).
//! - [`StandardAnalyzer`](analyzer::standard::StandardAnalyzer) is the term
//!   tokenizer used inside the TF-IDF vectorizer.

pub mod analyzer;
pub mod char_filter;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::portuguese::PortugueseAnalyzer;
use crate::error::Result;

/// Run `text` through an analyzer and join the surviving token texts with
/// single spaces.
pub fn analyze_to_string(analyzer: &dyn Analyzer, text: &str) -> Result<String> {
    let terms: Vec<String> = analyzer.analyze(text)?.map(|token| token.text).collect();
    Ok(terms.join(" "))
}

/// Normalize free text with the Portuguese cleaning pipeline.
///
/// Lowercases, strips every character that is neither a word character nor
/// whitespace, drops Portuguese stopwords and stems what is left. Empty or
/// whitespace-only input yields an empty string.
///
/// Builds a fresh analyzer on every call; hold a [`PortugueseAnalyzer`] when
/// cleaning a whole corpus.
pub fn preprocess(text: &str) -> Result<String> {
    let analyzer = PortugueseAnalyzer::new()?;
    analyze_to_string(&analyzer, text)
}
