//! Analyzers combine char filters, a tokenizer and token filters into one
//! text processing pipeline.
//!
//! # Available Implementations
//!
//! - [`PipelineAnalyzer`](pipeline::PipelineAnalyzer) - Custom tokenizer + filter chains
//! - [`PortugueseAnalyzer`](portuguese::PortugueseAnalyzer) - Cleaning for Portuguese free text
//! - [`StandardAnalyzer`](standard::StandardAnalyzer) - Lowercased terms of two or more word characters
//!
//! # Examples
//!
//! ```
//! use sentix::analysis::analyzer::Analyzer;
//! use sentix::analysis::analyzer::standard::StandardAnalyzer;
//!
//! let analyzer = StandardAnalyzer::new().unwrap();
//! let tokens: Vec<_> = analyzer.analyze("Caneca AZUL").unwrap().collect();
//!
//! assert_eq!(tokens[0].text, "caneca");
//! assert_eq!(tokens[1].text, "azul");
//! ```

pub mod pipeline;
pub mod portuguese;
pub mod standard;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so fitted models holding an analyzer can
/// be shared freely.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and logs).
    fn name(&self) -> &'static str;
}
