//! Labeled transaction dataset.
//!
//! Rows come from a CSV export of retail transactions. Each kept row becomes
//! a [`Record`](record::Record): the raw description, the quantity, the
//! [`Sentiment`](record::Sentiment) derived from the quantity and the cleaned
//! description used for training.

pub mod labeler;
pub mod loader;
pub mod record;

use std::collections::BTreeMap;

use log::debug;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::portuguese::PortugueseAnalyzer;
use crate::dataset::record::{Record, Sentiment};
use crate::error::{Result, SentixError};

/// An immutable, ordered collection of labeled records.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset from `(description, quantity)` rows.
    ///
    /// Rows whose description is blank are dropped. Each remaining row is
    /// labeled from its quantity and cleaned with the Portuguese analyzer.
    /// Fails with an input error if no row survives.
    pub fn from_rows<I, S>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let analyzer = PortugueseAnalyzer::new()?;
        Self::from_rows_with_analyzer(rows, &analyzer)
    }

    /// Build a dataset cleaning descriptions with a custom analyzer.
    pub fn from_rows_with_analyzer<I, S>(rows: I, analyzer: &dyn Analyzer) -> Result<Self>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (description, quantity) in rows {
            let description = description.into();
            if description.trim().is_empty() {
                skipped += 1;
                continue;
            }
            records.push(Record::new(description, quantity, analyzer)?);
        }

        if skipped > 0 {
            debug!("Skipped {skipped} rows without description");
        }

        if records.is_empty() {
            return Err(SentixError::input(
                "dataset is empty after dropping rows without description",
            ));
        }

        Ok(Dataset { records })
    }

    /// All records in file order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Raw descriptions, in record order.
    pub fn descriptions(&self) -> Vec<String> {
        self.records.iter().map(|r| r.description.clone()).collect()
    }

    /// Cleaned descriptions, in record order.
    pub fn clean_texts(&self) -> Vec<String> {
        self.records.iter().map(|r| r.clean_text.clone()).collect()
    }

    /// Labels, in record order.
    pub fn labels(&self) -> Vec<Sentiment> {
        self.records.iter().map(|r| r.sentiment).collect()
    }

    /// Number of records per label. Labels without records are absent.
    pub fn label_counts(&self) -> BTreeMap<Sentiment, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.sentiment).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_follow_quantity() {
        let dataset = Dataset::from_rows(vec![
            ("ótimo produto", 15),
            ("produto pessimo", -5),
            ("produto comum", 3),
        ])
        .unwrap();

        assert_eq!(
            dataset.labels(),
            vec![Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral]
        );
        assert_eq!(dataset.descriptions()[0], "ótimo produto");
    }

    #[test]
    fn test_blank_descriptions_are_dropped() {
        let dataset =
            Dataset::from_rows(vec![("caneca azul", 1), ("   ", 20), ("", -3)]).unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].description, "caneca azul");
    }

    #[test]
    fn test_empty_dataset_is_an_input_error() {
        let result = Dataset::from_rows(vec![(" ", 1)]);
        assert!(matches!(result, Err(SentixError::Input(_))));

        let result = Dataset::from_rows(Vec::<(String, i64)>::new());
        assert!(matches!(result, Err(SentixError::Input(_))));
    }

    #[test]
    fn test_label_counts() {
        let dataset = Dataset::from_rows(vec![
            ("a caneca", 12),
            ("o copo", 24),
            ("o pires", -1),
        ])
        .unwrap();

        let counts = dataset.label_counts();
        assert_eq!(counts.get(&Sentiment::Positive), Some(&2));
        assert_eq!(counts.get(&Sentiment::Negative), Some(&1));
        assert_eq!(counts.get(&Sentiment::Neutral), None);
    }

    #[test]
    fn test_clean_texts() {
        let dataset = Dataset::from_rows(vec![("Produtos, CANECA!", 1)]).unwrap();
        assert_eq!(dataset.clean_texts(), vec!["produt canec".to_string()]);
    }
}
