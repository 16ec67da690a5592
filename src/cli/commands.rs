//! Command implementations for the Sentix CLI.

use std::collections::BTreeMap;

use log::info;
use serde::Serialize;

use crate::cli::args::SentixArgs;
use crate::cli::output::output_outcome;
use crate::dataset::loader::load_dataset;
use crate::dataset::record::Sentiment;
use crate::error::Result;
use crate::explain::{Explainer, Explanation, create_explainer};
use crate::model::{ClassificationReport, fit_explanation_pipeline, train_and_evaluate};

/// Label counts of the loaded dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub label_counts: BTreeMap<Sentiment, usize>,
}

/// Probability of one label.
#[derive(Debug, Clone, Serialize)]
pub struct ClassProbability {
    pub label: Sentiment,
    pub probability: f64,
}

/// Prediction for the `--text` sentence.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub text: String,
    pub label: Sentiment,
    pub probabilities: Vec<ClassProbability>,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub dataset: DatasetSummary,
    pub train_size: usize,
    pub test_size: usize,
    pub report: ClassificationReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explanations: Vec<Explanation>,
}

/// Execute a CLI invocation and print its outcome.
pub fn execute_command(args: SentixArgs) -> Result<()> {
    let outcome = run(&args)?;
    output_outcome(&outcome, &args)
}

/// Run the pipeline: load, label, train, evaluate and optionally explain.
pub fn run(args: &SentixArgs) -> Result<RunOutcome> {
    let config = args.resolve_config()?;

    // Resolve backends first so a missing one fails before any training.
    let explainers: Vec<Box<dyn Explainer>> = match args.text() {
        Some(_) => args
            .method
            .backends()
            .into_iter()
            .map(|backend| create_explainer(backend, &config.lime, &config.shap))
            .collect::<Result<_>>()?,
        None => Vec::new(),
    };

    let dataset = load_dataset(&config.data)?;
    let training = train_and_evaluate(&dataset, &config.training)?;

    let mut outcome = RunOutcome {
        dataset: DatasetSummary {
            records: dataset.len(),
            label_counts: dataset.label_counts(),
        },
        train_size: training.train_size,
        test_size: training.test_size,
        report: training.report,
        prediction: None,
        explanations: Vec::new(),
    };

    let Some(text) = args.text() else {
        return Ok(outcome);
    };

    let pipeline = fit_explanation_pipeline(&dataset, &config.training)?;
    let label = pipeline.predict(text)?;
    info!("Predicted sentiment: {label}");
    outcome.prediction = Some(Prediction {
        text: text.to_string(),
        label,
        probabilities: pipeline
            .predict_proba(text)?
            .into_iter()
            .map(|(label, probability)| ClassProbability { label, probability })
            .collect(),
    });

    for explainer in &explainers {
        outcome.explanations.push(explainer.explain(&pipeline, text)?);
    }

    Ok(outcome)
}
