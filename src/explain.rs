//! Local explanations of single predictions.
//!
//! Two interchangeable backends explain why the classifier assigned a label
//! to one sentence:
//!
//! - **LIME** fits a weighted linear surrogate on random word-removal
//!   perturbations of the sentence and writes an HTML report.
//! - **SHAP** computes exact Shapley values of the linear decision function
//!   against the mean training vector.
//!
//! Each backend is compiled only with its cargo feature (`lime`, `shap`,
//! both enabled by default). Requesting a missing one through
//! [`create_explainer`] returns an explanation error naming it.

#[cfg(feature = "lime")]
pub mod lime;

#[cfg(feature = "lime")]
pub mod report;

#[cfg(feature = "lime")]
pub mod ridge;

#[cfg(feature = "shap")]
pub mod shap;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dataset::record::Sentiment;
use crate::error::{Result, SentixError};
use crate::model::TextClassifier;

/// LIME sampling and reporting parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimeConfig {
    /// Number of words in the explanation.
    pub num_features: usize,
    /// Number of perturbed sentences, the original included.
    pub num_samples: usize,
    /// Width of the exponential kernel on cosine distance (scaled by 100).
    pub kernel_width: f64,
    /// Sampler seed. Unseeded runs draw from the OS generator.
    pub seed: Option<u64>,
    /// Where the HTML report is written.
    pub output_path: PathBuf,
    /// Label to explain. Defaults to the predicted label.
    pub class: Option<Sentiment>,
}

impl Default for LimeConfig {
    fn default() -> Self {
        LimeConfig {
            num_features: 5,
            num_samples: 5000,
            kernel_width: 25.0,
            seed: None,
            output_path: PathBuf::from("lime_explanation.html"),
            class: None,
        }
    }
}

/// SHAP attribution parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapConfig {
    /// Label to explain. Defaults to the predicted label.
    pub class: Option<Sentiment>,
}

/// An explanation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Lime,
    Shap,
}

impl Backend {
    /// Display name of the backend.
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Lime => "LIME",
            Backend::Shap => "SHAP",
        }
    }

    /// Whether this build includes the backend.
    pub fn is_available(&self) -> bool {
        match self {
            Backend::Lime => cfg!(feature = "lime"),
            Backend::Shap => cfg!(feature = "shap"),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The result of one backend.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum Explanation {
    #[cfg(feature = "lime")]
    Lime(lime::LimeExplanation),
    #[cfg(feature = "shap")]
    Shap(shap::ShapExplanation),
}

/// Explains a prediction of a fitted [`TextClassifier`].
pub trait Explainer: Send + Sync {
    /// Which backend this is.
    fn backend(&self) -> Backend;

    /// Explain the classifier's prediction for `text`.
    fn explain(&self, classifier: &TextClassifier, text: &str) -> Result<Explanation>;
}

/// Build the explainer for `backend`.
#[allow(unused_variables)]
pub fn create_explainer(
    backend: Backend,
    lime_config: &LimeConfig,
    shap_config: &ShapConfig,
) -> Result<Box<dyn Explainer>> {
    match backend {
        #[cfg(feature = "lime")]
        Backend::Lime => Ok(Box::new(lime::LimeExplainer::new(lime_config.clone()))),
        #[cfg(feature = "shap")]
        Backend::Shap => Ok(Box::new(shap::ShapExplainer::new(shap_config.clone()))),
        #[allow(unreachable_patterns)]
        other => Err(SentixError::backend_unavailable(other.name())),
    }
}

/// The label an explainer should explain: the configured one, else the
/// predicted one.
pub(crate) fn target_class(
    classifier: &TextClassifier,
    configured: Option<Sentiment>,
    predicted: Sentiment,
) -> Result<(Sentiment, usize)> {
    let class = configured.unwrap_or(predicted);
    let index = classifier.class_index(class).ok_or_else(|| {
        SentixError::explanation(format!(
            "cannot explain class `{class}`: the model was trained on {}",
            classifier
                .classes()
                .iter()
                .map(Sentiment::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })?;
    Ok((class, index))
}
