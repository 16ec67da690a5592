//! LIME explanations for text.
//!
//! The sentence is split on non-word runs and each distinct word becomes an
//! interpretable feature. Perturbed sentences drop random subsets of the
//! words (every occurrence of a dropped word goes), the classifier scores
//! them, and a weighted ridge surrogate fitted around the original sentence
//! gives each selected word a signed weight for the explained label.

use std::collections::HashMap;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use serde::Serialize;

use crate::dataset::record::Sentiment;
use crate::error::{Result, SentixError};
use crate::explain::report::write_lime_report;
use crate::explain::ridge::{RidgeFit, fit_weighted_ridge};
use crate::explain::{Backend, Explainer, Explanation, LimeConfig, target_class};
use crate::model::TextClassifier;
use crate::model::logistic::argmax;

/// Surrogate ridge penalty.
const SURROGATE_ALPHA: f64 = 1.0;
/// Ridge penalty used while selecting features.
const SELECTION_ALPHA: f64 = 0.01;
/// Up to this many features, selection is greedy forward selection.
const FORWARD_SELECTION_LIMIT: usize = 6;

/// A word and its surrogate weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordWeight {
    pub word: String,
    pub weight: f64,
}

/// Result of a LIME run.
#[derive(Debug, Clone, Serialize)]
pub struct LimeExplanation {
    /// The explained sentence.
    pub text: String,
    /// Label whose probability the surrogate models.
    pub class: Sentiment,
    /// Label predicted for the sentence.
    pub predicted: Sentiment,
    /// Probability of each label for the sentence.
    pub probabilities: Vec<(Sentiment, f64)>,
    /// Selected words, largest absolute weight first.
    pub weights: Vec<WordWeight>,
    /// Surrogate intercept.
    pub intercept: f64,
    /// Weighted R² of the surrogate on the samples.
    pub score: f64,
    /// Surrogate prediction for the unperturbed sentence.
    pub local_prediction: f64,
    /// Where the HTML report was written, if it was.
    pub report_path: Option<std::path::PathBuf>,
}

/// The sentence split into words and separators.
#[derive(Debug, Clone)]
pub struct IndexedText {
    /// Words and separators in order; concatenated they give the text back.
    pieces: Vec<String>,
    /// For each piece, the feature it belongs to, `None` for separators.
    features: Vec<Option<usize>>,
    /// Distinct words in first-occurrence order.
    vocabulary: Vec<String>,
}

impl IndexedText {
    /// Split `text` on runs matching `\W+`.
    pub fn new(text: &str) -> Result<Self> {
        let separator = Regex::new(r"\W+").map_err(|e| SentixError::explanation(e.to_string()))?;

        let mut pieces = Vec::new();
        let mut features = Vec::new();
        let mut vocabulary: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        let mut push_word = |word: &str, pieces: &mut Vec<String>, features: &mut Vec<Option<usize>>| {
            let next = index.len();
            let feature = *index.entry(word.to_string()).or_insert_with(|| {
                vocabulary.push(word.to_string());
                next
            });
            pieces.push(word.to_string());
            features.push(Some(feature));
        };

        let mut last = 0;
        for m in separator.find_iter(text) {
            if m.start() > last {
                push_word(&text[last..m.start()], &mut pieces, &mut features);
            }
            pieces.push(m.as_str().to_string());
            features.push(None);
            last = m.end();
        }
        if last < text.len() {
            push_word(&text[last..], &mut pieces, &mut features);
        }

        Ok(IndexedText {
            pieces,
            features,
            vocabulary,
        })
    }

    /// Distinct words.
    pub fn words(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn num_words(&self) -> usize {
        self.vocabulary.len()
    }

    /// Pieces of the text in order, each paired with its word when it is one.
    pub fn pieces(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.pieces.iter().zip(&self.features).map(move |(piece, feature)| {
            (
                piece.as_str(),
                feature.map(|f| self.vocabulary[f].as_str()),
            )
        })
    }

    /// The text with every occurrence of the flagged words removed.
    pub fn without(&self, removed: &[bool]) -> String {
        self.pieces
            .iter()
            .zip(&self.features)
            .filter(|(_, feature)| feature.is_none_or(|f| !removed[f]))
            .map(|(piece, _)| piece.as_str())
            .collect()
    }
}

/// LIME backend.
#[derive(Debug, Clone)]
pub struct LimeExplainer {
    config: LimeConfig,
}

impl LimeExplainer {
    pub fn new(config: LimeConfig) -> Self {
        LimeExplainer { config }
    }

    pub fn config(&self) -> &LimeConfig {
        &self.config
    }

    /// Explain `text` given a batch probability function.
    ///
    /// `classes` names the probability columns. `class` selects the column to
    /// explain; `None` explains the most probable label of `text`.
    pub fn explain_instance<F>(
        &self,
        text: &str,
        classes: &[Sentiment],
        class: Option<usize>,
        predict_proba: F,
    ) -> Result<LimeExplanation>
    where
        F: Fn(&[String]) -> Result<Vec<Vec<f64>>>,
    {
        let indexed = IndexedText::new(text)?;
        let d = indexed.num_words();
        if d == 0 {
            return Err(SentixError::explanation("text has no words to explain"));
        }
        if self.config.num_samples < 2 {
            return Err(SentixError::explanation("LIME needs at least 2 samples"));
        }
        if self.config.kernel_width <= 0.0 {
            return Err(SentixError::explanation("kernel width must be positive"));
        }

        let (masks, texts) = self.sample(&indexed);
        let probabilities = predict_proba(&texts)?;
        if probabilities.len() != texts.len() || probabilities[0].len() != classes.len() {
            return Err(SentixError::explanation(
                "probability function returned an unexpected shape",
            ));
        }

        let predicted_index = argmax(&probabilities[0]);
        let class_index = class.unwrap_or(predicted_index);
        if class_index >= classes.len() {
            return Err(SentixError::explanation(format!(
                "class index {class_index} is out of range"
            )));
        }

        let rows: Vec<Vec<f64>> = masks
            .iter()
            .map(|active| active.iter().map(|&a| if a { 1.0 } else { 0.0 }).collect())
            .collect();
        let weights: Vec<f64> = masks
            .iter()
            .map(|active| kernel(cosine_distance(active) * 100.0, self.config.kernel_width))
            .collect();
        let target: Vec<f64> = probabilities.iter().map(|p| p[class_index]).collect();

        let selected = self.select_features(&rows, &target, &weights)?;
        let columns = |rows: &[Vec<f64>]| -> Vec<Vec<f64>> {
            rows.iter()
                .map(|r| selected.iter().map(|&j| r[j]).collect())
                .collect()
        };
        let sub_rows = columns(&rows);
        let surrogate = fit_weighted_ridge(&sub_rows, &target, &weights, SURROGATE_ALPHA)?;
        let score = surrogate.score(&sub_rows, &target, &weights);
        let local_prediction = surrogate.predict(&sub_rows[0]);

        let mut word_weights: Vec<WordWeight> = selected
            .iter()
            .zip(&surrogate.coef)
            .map(|(&j, &weight)| WordWeight {
                word: indexed.words()[j].clone(),
                weight,
            })
            .collect();
        word_weights.sort_by(|a, b| b.weight.abs().total_cmp(&a.weight.abs()));

        debug!(
            "LIME surrogate: intercept {:.4}, R² {:.4}, local prediction {:.4}",
            surrogate.intercept, score, local_prediction
        );

        Ok(LimeExplanation {
            text: text.to_string(),
            class: classes[class_index],
            predicted: classes[predicted_index],
            probabilities: classes.iter().copied().zip(probabilities[0].iter().copied()).collect(),
            weights: word_weights,
            intercept: surrogate.intercept,
            score,
            local_prediction,
            report_path: None,
        })
    }

    /// Draw the perturbation masks (`true` = word kept) and their texts.
    ///
    /// The first sample is the original sentence. Every other one removes a
    /// uniformly drawn number of distinct words, chosen without replacement.
    fn sample(&self, indexed: &IndexedText) -> (Vec<Vec<bool>>, Vec<String>) {
        let d = indexed.num_words();
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let n = self.config.num_samples;
        let mut masks = Vec::with_capacity(n);
        let mut texts = Vec::with_capacity(n);
        masks.push(vec![true; d]);
        texts.push(indexed.without(&vec![false; d]));

        for _ in 1..n {
            let size = rng.random_range(1..=d);
            let mut removed = vec![false; d];
            for j in rand::seq::index::sample(&mut rng, d, size).iter() {
                removed[j] = true;
            }
            texts.push(indexed.without(&removed));
            masks.push(removed.iter().map(|&r| !r).collect());
        }

        (masks, texts)
    }

    fn select_features(&self, rows: &[Vec<f64>], target: &[f64], weights: &[f64]) -> Result<Vec<usize>> {
        let d = rows[0].len();
        let k = self.config.num_features.min(d);
        if k == 0 {
            return Err(SentixError::explanation("num_features must be at least 1"));
        }

        if k <= FORWARD_SELECTION_LIMIT {
            forward_selection(rows, target, weights, k)
        } else {
            highest_weights(rows, target, weights, k)
        }
    }
}

/// Greedily add the feature that most improves the weighted R².
fn forward_selection(rows: &[Vec<f64>], target: &[f64], weights: &[f64], k: usize) -> Result<Vec<usize>> {
    let d = rows[0].len();
    let mut used: Vec<usize> = Vec::with_capacity(k);

    for _ in 0..k {
        let mut best: Option<(usize, f64)> = None;
        for candidate in (0..d).filter(|j| !used.contains(j)) {
            let mut columns = used.clone();
            columns.push(candidate);
            let sub: Vec<Vec<f64>> = rows
                .iter()
                .map(|r| columns.iter().map(|&j| r[j]).collect())
                .collect();
            let fit = fit_weighted_ridge(&sub, target, weights, SELECTION_ALPHA)?;
            let score = fit.score(&sub, target, weights);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((candidate, score));
            }
        }
        match best {
            Some((feature, _)) => used.push(feature),
            None => break,
        }
    }

    Ok(used)
}

/// Keep the features with the largest absolute weight in a full fit.
fn highest_weights(rows: &[Vec<f64>], target: &[f64], weights: &[f64], k: usize) -> Result<Vec<usize>> {
    let RidgeFit { coef, .. } = fit_weighted_ridge(rows, target, weights, SELECTION_ALPHA)?;
    let mut order: Vec<usize> = (0..coef.len()).collect();
    order.sort_by(|&a, &b| coef[b].abs().total_cmp(&coef[a].abs()));
    order.truncate(k);
    Ok(order)
}

/// Cosine distance between a mask and the all-kept mask.
fn cosine_distance(active: &[bool]) -> f64 {
    let kept = active.iter().filter(|&&a| a).count() as f64;
    1.0 - (kept / active.len() as f64).sqrt()
}

fn kernel(distance: f64, width: f64) -> f64 {
    (-(distance * distance) / (width * width)).exp().sqrt()
}

impl Explainer for LimeExplainer {
    fn backend(&self) -> Backend {
        Backend::Lime
    }

    fn explain(&self, classifier: &TextClassifier, text: &str) -> Result<Explanation> {
        info!("[LIME] Explaining text...");
        let predicted = classifier.predict(text)?;
        let (_, class_index) = target_class(classifier, self.config.class, predicted)?;

        let mut explanation = self.explain_instance(
            text,
            classifier.classes(),
            Some(class_index),
            |texts| classifier.predict_proba_batch(texts),
        )?;

        write_lime_report(&self.config.output_path, &explanation)?;
        info!("LIME explanation saved at {}", self.config.output_path.display());
        explanation.report_path = Some(self.config.output_path.clone());

        Ok(Explanation::Lime(explanation))
    }
}
