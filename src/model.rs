//! Text classification model.
//!
//! A TF-IDF vectorizer feeding a multinomial logistic regression, the
//! stratified split used to evaluate it and the classification report.

pub mod classifier;
pub mod lbfgs;
pub mod logistic;
pub mod metrics;
pub mod sparse;
pub mod split;
pub mod tfidf;
pub mod trainer;

pub use classifier::TextClassifier;
pub use metrics::ClassificationReport;
pub use trainer::{TrainingConfig, TrainingOutcome, fit_explanation_pipeline, train_and_evaluate};
