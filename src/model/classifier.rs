//! Fitted text classification pipeline.

use log::debug;

use crate::dataset::record::Sentiment;
use crate::error::{Result, SentixError};
use crate::model::logistic::{LogisticConfig, LogisticRegression, argmax};
use crate::model::sparse::SparseVector;
use crate::model::tfidf::TfIdfVectorizer;

/// TF-IDF vectorizer and logistic regression fitted together.
///
/// Once built the pipeline is read-only; explainers borrow it.
#[derive(Debug)]
pub struct TextClassifier {
    vectorizer: TfIdfVectorizer,
    model: LogisticRegression,
    /// Sorted labels; position is the model's class index.
    classes: Vec<Sentiment>,
    /// Mean TF-IDF vector of the training documents.
    background: Vec<f64>,
}

impl TextClassifier {
    /// Fit a pipeline on `documents` labeled with `labels`.
    pub fn fit(documents: &[String], labels: &[Sentiment], config: &LogisticConfig) -> Result<Self> {
        if documents.len() != labels.len() {
            return Err(SentixError::model(format!(
                "found {} documents but {} labels",
                documents.len(),
                labels.len()
            )));
        }

        let mut vectorizer = TfIdfVectorizer::standard()?;
        let rows = vectorizer.fit_transform(documents)?;
        Self::fit_vectors(vectorizer, &rows, labels, config)
    }

    /// Fit the classifier on rows already produced by a fitted `vectorizer`.
    ///
    /// The vectorizer may have been fit on more documents than `rows`, e.g.
    /// a whole corpus of which `rows` is the training partition.
    pub fn fit_vectors(
        vectorizer: TfIdfVectorizer,
        rows: &[SparseVector],
        labels: &[Sentiment],
        config: &LogisticConfig,
    ) -> Result<Self> {
        if !vectorizer.is_fitted() {
            return Err(SentixError::model("vectorizer is not fitted"));
        }
        if rows.len() != labels.len() {
            return Err(SentixError::model(format!(
                "found {} rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }

        let mut classes = labels.to_vec();
        classes.sort_unstable();
        classes.dedup();
        if classes.len() < 2 {
            let only = classes
                .first()
                .map_or_else(|| "none".to_string(), Sentiment::to_string);
            return Err(SentixError::model(format!(
                "training data contains a single class ({only}); at least two are required"
            )));
        }

        let n_features = vectorizer.vocabulary_size();
        let targets: Vec<usize> = labels
            .iter()
            .map(|label| classes.binary_search(label).unwrap_or_default())
            .collect();

        debug!(
            "Fitting classifier on {} documents, {} features, {} classes",
            rows.len(),
            n_features,
            classes.len()
        );
        let model = LogisticRegression::fit(rows, &targets, classes.len(), n_features, config)?;

        let mut background = vec![0.0; n_features];
        for row in rows {
            for (j, v) in row.iter() {
                background[j] += v;
            }
        }
        let n = rows.len() as f64;
        for v in &mut background {
            *v /= n;
        }

        Ok(TextClassifier {
            vectorizer,
            model,
            classes,
            background,
        })
    }

    /// Vectorize `text` with the fitted vocabulary.
    pub fn transform(&self, text: &str) -> Result<SparseVector> {
        self.vectorizer.transform(text)
    }

    /// Per-class scores before the softmax, in class order.
    pub fn decision_function(&self, text: &str) -> Result<Vec<f64>> {
        Ok(self.model.decision_function(&self.transform(text)?))
    }

    /// Most probable label.
    pub fn predict(&self, text: &str) -> Result<Sentiment> {
        let scores = self.decision_function(text)?;
        Ok(self.classes[argmax(&scores)])
    }

    /// Label of an already vectorized row.
    pub fn predict_vector(&self, row: &SparseVector) -> Sentiment {
        self.classes[argmax(&self.model.decision_function(row))]
    }

    /// Labels for many texts.
    pub fn predict_batch(&self, texts: &[String]) -> Result<Vec<Sentiment>> {
        texts.iter().map(|t| self.predict(t)).collect()
    }

    /// Probability of each label, in class order.
    pub fn predict_proba(&self, text: &str) -> Result<Vec<(Sentiment, f64)>> {
        let proba = self.model.predict_proba(&self.transform(text)?);
        Ok(self.classes.iter().copied().zip(proba).collect())
    }

    /// Probability rows for many texts, columns in class order.
    pub fn predict_proba_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        texts
            .iter()
            .map(|t| Ok(self.model.predict_proba(&self.transform(t)?)))
            .collect()
    }

    /// Labels known to the model, sorted.
    pub fn classes(&self) -> &[Sentiment] {
        &self.classes
    }

    /// Position of `label` among [`classes`](Self::classes).
    pub fn class_index(&self, label: Sentiment) -> Option<usize> {
        self.classes.binary_search(&label).ok()
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &LogisticRegression {
        &self.model
    }

    /// Mean training vector, used as the attribution baseline.
    pub fn background(&self) -> &[f64] {
        &self.background
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> (Vec<String>, Vec<Sentiment>) {
        let rows = [
            ("caneca grande caixa", Sentiment::Positive),
            ("caneca grande atacado", Sentiment::Positive),
            ("caixa grande atacado", Sentiment::Positive),
            ("devolução desconto", Sentiment::Negative),
            ("devolução cancelado", Sentiment::Negative),
            ("desconto cancelado", Sentiment::Negative),
            ("pires azul", Sentiment::Neutral),
            ("pires verde", Sentiment::Neutral),
            ("vaso azul", Sentiment::Neutral),
        ];
        rows.iter()
            .map(|(t, l)| (t.to_string(), *l))
            .unzip()
    }

    #[test]
    fn test_fit_and_predict() {
        let (docs, labels) = corpus();
        let classifier = TextClassifier::fit(&docs, &labels, &LogisticConfig::default()).unwrap();

        assert_eq!(classifier.classes(), &Sentiment::ALL);
        assert_eq!(classifier.predict("caneca grande").unwrap(), Sentiment::Positive);
        assert_eq!(classifier.predict("devolução").unwrap(), Sentiment::Negative);
        assert_eq!(classifier.predict("pires azul").unwrap(), Sentiment::Neutral);
        assert_eq!(
            classifier.predict_batch(&docs).unwrap(),
            labels
        );
    }

    #[test]
    fn test_probabilities() {
        let (docs, labels) = corpus();
        let classifier = TextClassifier::fit(&docs, &labels, &LogisticConfig::default()).unwrap();

        let proba = classifier.predict_proba("caneca azul").unwrap();
        assert_eq!(proba.len(), 3);
        assert!((proba.iter().map(|(_, p)| p).sum::<f64>() - 1.0).abs() < 1e-12);

        let batch = classifier
            .predict_proba_batch(&["caneca azul".to_string(), "".to_string()])
            .unwrap();
        assert_eq!(batch.len(), 2);
        assert!((batch[0][2] - proba[2].1).abs() < 1e-12);
    }

    #[test]
    fn test_background_is_mean_vector() {
        let (docs, labels) = corpus();
        let classifier = TextClassifier::fit(&docs, &labels, &LogisticConfig::default()).unwrap();

        let rows = classifier.vectorizer().transform_batch(&docs).unwrap();
        let j = classifier.vectorizer().index_of("azul").unwrap();
        let mean = rows.iter().map(|r| r.get(j)).sum::<f64>() / rows.len() as f64;
        assert!((classifier.background()[j] - mean).abs() < 1e-12);
    }

    #[test]
    fn test_single_class_is_a_model_error() {
        let docs = vec!["caneca".to_string(), "pires".to_string()];
        let labels = vec![Sentiment::Neutral, Sentiment::Neutral];
        let err = TextClassifier::fit(&docs, &labels, &LogisticConfig::default()).unwrap_err();

        assert!(matches!(err, SentixError::Model(_)));
        assert!(err.to_string().contains("neutral"));
    }

    #[test]
    fn test_fit_vectors_keeps_corpus_vocabulary() {
        let (docs, labels) = corpus();
        let mut vectorizer = TfIdfVectorizer::standard().unwrap();
        let rows = vectorizer.fit_transform(&docs).unwrap();

        // Train on the first six rows only; "pires" is never seen in training.
        let classifier =
            TextClassifier::fit_vectors(vectorizer, &rows[..6], &labels[..6], &LogisticConfig::default())
                .unwrap();

        assert_eq!(classifier.vectorizer().n_documents(), docs.len());
        assert!(classifier.vectorizer().index_of("pires").is_some());
        assert_eq!(classifier.classes(), &[Sentiment::Negative, Sentiment::Positive]);
        assert_eq!(classifier.predict_vector(&rows[0]), Sentiment::Positive);
        assert_eq!(classifier.background().len(), classifier.vectorizer().vocabulary_size());
    }

    #[test]
    fn test_fit_vectors_requires_fitted_vectorizer() {
        let vectorizer = TfIdfVectorizer::standard().unwrap();
        let err = TextClassifier::fit_vectors(vectorizer, &[], &[], &LogisticConfig::default())
            .unwrap_err();
        assert!(matches!(err, SentixError::Model(_)));
    }

    #[test]
    fn test_class_index() {
        let docs = vec!["caneca".to_string(), "pires".to_string()];
        let labels = vec![Sentiment::Positive, Sentiment::Negative];
        let classifier = TextClassifier::fit(&docs, &labels, &LogisticConfig::default()).unwrap();

        assert_eq!(classifier.class_index(Sentiment::Negative), Some(0));
        assert_eq!(classifier.class_index(Sentiment::Positive), Some(1));
        assert_eq!(classifier.class_index(Sentiment::Neutral), None);
    }
}
