//! Training and evaluation runs.

use log::info;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::Result;
use crate::model::classifier::TextClassifier;
use crate::model::logistic::LogisticConfig;
use crate::model::metrics::ClassificationReport;
use crate::model::split::stratified_split;
use crate::model::tfidf::TfIdfVectorizer;

/// Parameters of the evaluation split and the classifier fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Fraction of rows held out for evaluation.
    pub test_size: f64,
    /// Seed of the split shuffle.
    pub seed: u64,
    /// Logistic regression parameters.
    pub logistic: LogisticConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            test_size: 0.2,
            seed: 42,
            logistic: LogisticConfig::default(),
        }
    }
}

/// Result of [`train_and_evaluate`].
#[derive(Debug)]
pub struct TrainingOutcome {
    /// Vectorizer fitted on every record, classifier on the training partition.
    pub classifier: TextClassifier,
    /// Metrics on the held-out partition.
    pub report: ClassificationReport,
    pub train_size: usize,
    pub test_size: usize,
}

/// Vectorize every cleaned description, then fit the classifier on a
/// stratified training partition and evaluate on the rest.
///
/// The TF-IDF vocabulary and IDF weights come from the whole cleaned corpus;
/// only the logistic regression sees the partition.
pub fn train_and_evaluate(dataset: &Dataset, config: &TrainingConfig) -> Result<TrainingOutcome> {
    let labels = dataset.labels();

    let mut vectorizer = TfIdfVectorizer::standard()?;
    let rows = vectorizer.fit_transform(&dataset.clean_texts())?;
    info!(
        "Vectorized {} records into {} features",
        rows.len(),
        vectorizer.vocabulary_size()
    );

    let split = stratified_split(&labels, config.test_size, config.seed)?;
    info!(
        "Split {} records into {} train / {} test",
        labels.len(),
        split.train.len(),
        split.test.len()
    );

    let pick_rows = |idx: &[usize]| idx.iter().map(|&i| rows[i].clone()).collect::<Vec<_>>();
    let pick_labels = |idx: &[usize]| idx.iter().map(|&i| labels[i]).collect::<Vec<_>>();

    let classifier = TextClassifier::fit_vectors(
        vectorizer,
        &pick_rows(&split.train),
        &pick_labels(&split.train),
        &config.logistic,
    )?;
    info!("Trained in {} iterations", classifier.model().n_iter());

    let predictions: Vec<_> = split
        .test
        .iter()
        .map(|&i| classifier.predict_vector(&rows[i]))
        .collect();
    let report = ClassificationReport::compute(&pick_labels(&split.test), &predictions)?;
    info!("Held-out accuracy: {:.4}", report.accuracy);

    Ok(TrainingOutcome {
        classifier,
        report,
        train_size: split.train.len(),
        test_size: split.test.len(),
    })
}

/// Fit the pipeline used for explanations on the raw descriptions of every
/// record.
pub fn fit_explanation_pipeline(dataset: &Dataset, config: &TrainingConfig) -> Result<TextClassifier> {
    info!("Fitting explanation pipeline on {} raw descriptions", dataset.len());
    TextClassifier::fit(&dataset.descriptions(), &dataset.labels(), &config.logistic)
}
