//! TF-IDF vectorizer for text feature extraction.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::standard::StandardAnalyzer;
use crate::error::{Result, SentixError};
use crate::model::sparse::SparseVector;

/// TF-IDF vectorizer producing L2-normalized sparse rows.
///
/// Term frequencies are raw counts, the inverse document frequency is
/// smoothed as `ln((1 + n) / (1 + df)) + 1`, and columns follow the
/// lexicographic order of the terms so that two fits on the same corpus
/// produce identical matrices.
pub struct TfIdfVectorizer {
    /// Vocabulary: term -> column index.
    vocabulary: HashMap<String, usize>,
    /// Column index -> term.
    feature_names: Vec<String>,
    /// Inverse document frequency for each column.
    idf: Vec<f64>,
    /// Total number of documents seen during fitting.
    n_documents: usize,
    /// Analyzer for tokenization.
    analyzer: Arc<dyn Analyzer>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create a new TF-IDF vectorizer with the specified analyzer.
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            vocabulary: HashMap::new(),
            feature_names: Vec::new(),
            idf: Vec::new(),
            n_documents: 0,
            analyzer,
        }
    }

    /// Create a vectorizer that lowercases and keeps terms of two or more word characters.
    pub fn standard() -> Result<Self> {
        Ok(Self::new(Arc::new(StandardAnalyzer::new()?)))
    }

    /// Fit the vectorizer on training documents.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();

        for doc in documents {
            let mut terms = self.tokenize(doc)?;
            terms.sort_unstable();
            terms.dedup();
            for term in terms {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(SentixError::model(
                "empty vocabulary: the documents contain no terms",
            ));
        }

        let n = documents.len() as f64;
        let mut vocabulary = HashMap::with_capacity(document_frequency.len());
        let mut feature_names = Vec::with_capacity(document_frequency.len());
        let mut idf = Vec::with_capacity(document_frequency.len());

        for (idx, (term, df)) in document_frequency.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term.clone(), idx);
            feature_names.push(term);
        }

        self.vocabulary = vocabulary;
        self.feature_names = feature_names;
        self.idf = idf;
        self.n_documents = documents.len();

        Ok(())
    }

    /// Fit on `documents` and return their vectors.
    pub fn fit_transform(&mut self, documents: &[String]) -> Result<Vec<SparseVector>> {
        self.fit(documents)?;
        self.transform_batch(documents)
    }

    /// Transform a document into a TF-IDF feature vector.
    ///
    /// Terms outside the vocabulary are ignored; a document with no known
    /// term yields the zero vector.
    pub fn transform(&self, document: &str) -> Result<SparseVector> {
        if !self.is_fitted() {
            return Err(SentixError::model("TF-IDF vectorizer is not fitted"));
        }

        let pairs = self
            .tokenize(document)?
            .into_iter()
            .filter_map(|term| self.vocabulary.get(&term).map(|&idx| (idx, 1.0)));
        let counts = SparseVector::from_pairs(pairs);

        let mut vector = SparseVector::from_pairs(counts.iter().map(|(i, tf)| (i, tf * self.idf[i])));
        let norm = vector.norm();
        if norm > 0.0 {
            vector.scale(1.0 / norm);
        }

        Ok(vector)
    }

    /// Transform many documents.
    pub fn transform_batch(&self, documents: &[String]) -> Result<Vec<SparseVector>> {
        documents.iter().map(|doc| self.transform(doc)).collect()
    }

    /// Terms produced by the vectorizer's analyzer, in text order.
    pub fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyzer.analyze(text)?.map(|token| token.text).collect())
    }

    /// Whether `fit` has run.
    pub fn is_fitted(&self) -> bool {
        !self.feature_names.is_empty()
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.feature_names.len()
    }

    /// Column of `term`, if it is in the vocabulary.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Term of column `index`.
    pub fn feature_name(&self, index: usize) -> Option<&str> {
        self.feature_names.get(index).map(String::as_str)
    }

    /// All terms in column order.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Inverse document frequencies in column order.
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Number of documents seen during fitting.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }
}
