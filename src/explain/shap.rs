//! Exact SHAP values for the linear classifier.
//!
//! For a linear decision function `f(x) = w · x + b` with independent
//! features and the mean training vector `μ` as background, the Shapley
//! value of feature `j` is `w_j (x_j - μ_j)`. Values of features present in
//! the sentence are spread over the sentence tokens that produced them; the
//! features absent from the sentence are summed into one contribution.

use std::collections::HashMap;
use std::fmt;

use log::info;
use serde::Serialize;

use crate::dataset::record::Sentiment;
use crate::error::Result;
use crate::explain::{Backend, Explainer, Explanation, ShapConfig, target_class};
use crate::model::TextClassifier;

/// Attribution of one sentence token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenAttribution {
    pub token: String,
    /// Vocabulary column of the token, `None` when unknown to the model.
    pub feature: Option<usize>,
    pub value: f64,
}

/// Result of a SHAP run.
#[derive(Debug, Clone, Serialize)]
pub struct ShapExplanation {
    pub text: String,
    /// Label whose decision score is explained.
    pub class: Sentiment,
    pub predicted: Sentiment,
    /// Expected decision score over the background.
    pub base_value: f64,
    /// One entry per token, in text order.
    pub tokens: Vec<TokenAttribution>,
    /// Summed attribution of vocabulary terms absent from the text.
    pub absent_contribution: f64,
    /// Decision score of `class` for the text.
    pub decision_value: f64,
}

impl ShapExplanation {
    /// `base_value` plus every attribution; equals `decision_value`.
    pub fn reconstructed_value(&self) -> f64 {
        self.base_value + self.tokens.iter().map(|t| t.value).sum::<f64>() + self.absent_contribution
    }

    /// Tokens ordered by decreasing absolute attribution.
    pub fn ranked(&self) -> Vec<&TokenAttribution> {
        let mut ranked: Vec<&TokenAttribution> = self.tokens.iter().collect();
        ranked.sort_by(|a, b| b.value.abs().total_cmp(&a.value.abs()));
        ranked
    }
}

impl fmt::Display for ShapExplanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "class {} (base value {:+.4})", self.class, self.base_value)?;
        for t in &self.tokens {
            writeln!(f, "  {:<20} {:+.4}", t.token, t.value)?;
        }
        writeln!(f, "  {:<20} {:+.4}", "(absent terms)", self.absent_contribution)?;
        write!(f, "decision value {:+.4}", self.decision_value)
    }
}

/// SHAP backend.
#[derive(Debug, Clone, Default)]
pub struct ShapExplainer {
    config: ShapConfig,
}

impl ShapExplainer {
    pub fn new(config: ShapConfig) -> Self {
        ShapExplainer { config }
    }

    /// Compute attributions of `text` for the configured or predicted label.
    pub fn shap_values(&self, classifier: &TextClassifier, text: &str) -> Result<ShapExplanation> {
        let predicted = classifier.predict(text)?;
        let (class, k) = target_class(classifier, self.config.class, predicted)?;

        let model = classifier.model();
        let weights = &model.coef()[k];
        let intercept = model.intercept()[k];
        let background = classifier.background();
        let x = classifier.transform(text)?;

        let base_value = intercept
            + weights
                .iter()
                .zip(background)
                .map(|(w, m)| w * m)
                .sum::<f64>();

        let present: HashMap<usize, f64> = x
            .iter()
            .map(|(j, v)| (j, weights[j] * (v - background[j])))
            .collect();
        let absent_contribution: f64 = weights
            .iter()
            .zip(background)
            .enumerate()
            .filter(|(j, _)| !present.contains_key(j))
            .map(|(_, (w, m))| -w * m)
            .sum();

        let vectorizer = classifier.vectorizer();
        let terms = vectorizer.tokenize(text)?;
        let features: Vec<Option<usize>> = terms.iter().map(|t| vectorizer.index_of(t)).collect();
        let mut occurrences: HashMap<usize, usize> = HashMap::new();
        for j in features.iter().flatten() {
            *occurrences.entry(*j).or_insert(0) += 1;
        }

        let tokens = terms
            .into_iter()
            .zip(features)
            .map(|(token, feature)| {
                let value = feature
                    .map(|j| present.get(&j).copied().unwrap_or(0.0) / occurrences[&j] as f64)
                    .unwrap_or(0.0);
                TokenAttribution {
                    token,
                    feature,
                    value,
                }
            })
            .collect();

        Ok(ShapExplanation {
            text: text.to_string(),
            class,
            predicted,
            base_value,
            tokens,
            absent_contribution,
            decision_value: model.decision_function(&x)[k],
        })
    }
}

impl Explainer for ShapExplainer {
    fn backend(&self) -> Backend {
        Backend::Shap
    }

    fn explain(&self, classifier: &TextClassifier, text: &str) -> Result<Explanation> {
        info!("[SHAP] Explaining text...");
        Ok(Explanation::Shap(self.shap_values(classifier, text)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::logistic::LogisticConfig;

    fn classifier() -> TextClassifier {
        let rows = [
            ("caneca grande caixa", Sentiment::Positive),
            ("caneca grande atacado", Sentiment::Positive),
            ("devolução desconto", Sentiment::Negative),
            ("devolução cancelado", Sentiment::Negative),
            ("pires azul", Sentiment::Neutral),
            ("pires verde azul", Sentiment::Neutral),
        ];
        let (docs, labels): (Vec<String>, Vec<Sentiment>) =
            rows.iter().map(|(t, l)| (t.to_string(), *l)).unzip();
        TextClassifier::fit(&docs, &labels, &LogisticConfig::default()).unwrap()
    }

    #[test]
    fn test_additivity() {
        let classifier = classifier();
        let explainer = ShapExplainer::default();

        for text in ["caneca grande", "devolução da caneca", "xícara nova", "", "azul azul pires"] {
            let explanation = explainer.shap_values(&classifier, text).unwrap();
            assert!(
                (explanation.reconstructed_value() - explanation.decision_value).abs() < 1e-9,
                "{text}"
            );
        }
    }

    #[test]
    fn test_token_signs() {
        let classifier = classifier();
        let explanation = ShapExplainer::default()
            .shap_values(&classifier, "caneca grande")
            .unwrap();

        assert_eq!(explanation.predicted, Sentiment::Positive);
        assert_eq!(explanation.class, Sentiment::Positive);
        assert_eq!(explanation.tokens.len(), 2);
        assert!(explanation.tokens.iter().all(|t| t.value > 0.0));
    }

    #[test]
    fn test_unknown_tokens_get_zero() {
        let classifier = classifier();
        let explanation = ShapExplainer::default()
            .shap_values(&classifier, "xícara caneca")
            .unwrap();

        assert_eq!(explanation.tokens[0].token, "xícara");
        assert_eq!(explanation.tokens[0].feature, None);
        assert_eq!(explanation.tokens[0].value, 0.0);
        assert_eq!(explanation.ranked()[0].token, "caneca");
    }

    #[test]
    fn test_repeated_tokens_share_value() {
        let classifier = classifier();
        let explanation = ShapExplainer::default()
            .shap_values(&classifier, "azul azul")
            .unwrap();

        assert_eq!(explanation.tokens.len(), 2);
        assert_eq!(explanation.tokens[0].value, explanation.tokens[1].value);
    }

    #[test]
    fn test_configured_class() {
        let classifier = classifier();
        let explainer = ShapExplainer::new(ShapConfig {
            class: Some(Sentiment::Negative),
        });
        let explanation = explainer.shap_values(&classifier, "caneca grande").unwrap();

        assert_eq!(explanation.class, Sentiment::Negative);
        assert!(explanation.tokens.iter().all(|t| t.value < 0.0));
        assert!(explanation.to_string().contains("(absent terms)"));
    }
}
