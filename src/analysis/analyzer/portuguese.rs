use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::stem::StemFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::Result;

/// Cleaning analyzer for Portuguese free text.
///
/// Strips punctuation, splits on whitespace, lowercases, removes Portuguese
/// stopwords and applies the RSLP stemmer.
pub struct PortugueseAnalyzer {
    inner: PipelineAnalyzer,
}

impl PortugueseAnalyzer {
    pub fn new() -> Result<Self> {
        let analyzer = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
            .add_char_filter(Arc::new(PatternReplaceCharFilter::strip_punctuation()?))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(StopFilter::new()))
            .add_filter(Arc::new(StemFilter::new()))
            .with_name("portuguese");

        Ok(Self { inner: analyzer })
    }
}

impl Analyzer for PortugueseAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "portuguese"
    }
}

impl Debug for PortugueseAnalyzer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortugueseAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_portuguese_analyzer() {
        let analyzer = PortugueseAnalyzer::new().unwrap();

        let tokens: Vec<Token> = analyzer
            .analyze("Os produtos, as BOLSAS e a caneca!")
            .unwrap()
            .collect();

        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["produt", "bols", "canec"]);
    }

    #[test]
    fn test_portuguese_analyzer_name() {
        assert_eq!(PortugueseAnalyzer::new().unwrap().name(), "portuguese");
    }
}
