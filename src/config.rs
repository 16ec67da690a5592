//! Run configuration.
//!
//! Every section has defaults matching the standard run, so a configuration
//! file only needs the fields it changes:
//!
//! ```json
//! {
//!   "data": { "path": "exports/2024.csv" },
//!   "training": { "logistic": { "max_iter": 500 } },
//!   "lime": { "num_features": 8, "seed": 1 }
//! }
//! ```

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dataset::loader::DataConfig;
use crate::error::{Result, SentixError};
use crate::explain::{LimeConfig, ShapConfig};
use crate::model::TrainingConfig;

/// Configuration of a full pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SentixConfig {
    pub data: DataConfig,
    pub training: TrainingConfig,
    pub lime: LimeConfig,
    pub shap: ShapConfig,
}

impl SentixConfig {
    /// Load a configuration from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SentixError::input(format!("cannot read config file {}: {e}", path.display()))
        })?;
        let config = Self::from_json(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: SentixConfig = serde_json::from_str(content)
            .map_err(|e| SentixError::input(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no run can use.
    pub fn validate(&self) -> Result<()> {
        let training = &self.training;
        if !(training.test_size > 0.0 && training.test_size < 1.0) {
            return Err(SentixError::input(format!(
                "training.test_size must be in (0, 1), got {}",
                training.test_size
            )));
        }
        if !(training.logistic.c > 0.0) {
            return Err(SentixError::input("training.logistic.c must be positive"));
        }
        if training.logistic.max_iter == 0 {
            return Err(SentixError::input("training.logistic.max_iter must be at least 1"));
        }
        if self.lime.num_features == 0 {
            return Err(SentixError::input("lime.num_features must be at least 1"));
        }
        if self.lime.num_samples < 2 {
            return Err(SentixError::input("lime.num_samples must be at least 2"));
        }
        if !(self.lime.kernel_width > 0.0) {
            return Err(SentixError::input("lime.kernel_width must be positive"));
        }
        if !self.data.delimiter.is_ascii() {
            return Err(SentixError::input("data.delimiter must be an ASCII character"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = SentixConfig::default();

        assert_eq!(config.data.path, PathBuf::from("dataset/data.csv"));
        assert_eq!(config.data.description_column, "Description");
        assert_eq!(config.training.test_size, 0.2);
        assert_eq!(config.training.seed, 42);
        assert_eq!(config.training.logistic.max_iter, 200);
        assert_eq!(config.training.logistic.c, 1.0);
        assert_eq!(config.lime.num_features, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = SentixConfig::from_json(
            r#"{"data": {"path": "x.csv"}, "training": {"logistic": {"max_iter": 50}}}"#,
        )
        .unwrap();

        assert_eq!(config.data.path, PathBuf::from("x.csv"));
        assert_eq!(config.data.quantity_column, "Quantity");
        assert_eq!(config.training.logistic.max_iter, 50);
        assert_eq!(config.training.logistic.c, 1.0);
        assert_eq!(config.training.seed, 42);
    }

    #[test]
    fn test_invalid_values() {
        assert!(SentixConfig::from_json(r#"{"training": {"test_size": 1.5}}"#).is_err());
        assert!(SentixConfig::from_json(r#"{"lime": {"num_features": 0}}"#).is_err());
        assert!(SentixConfig::from_json(r#"{"unknown": 1}"#).is_err());
        assert!(SentixConfig::from_json("not json").unwrap_err().is_input_error());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"lime": {{"seed": 9, "output_path": "out.html"}}}}"#).unwrap();
        file.flush().unwrap();

        let config = SentixConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.lime.seed, Some(9));
        assert_eq!(config.lime.output_path, PathBuf::from("out.html"));

        assert!(SentixConfig::load_from_file("/nonexistent/config.json").is_err());
    }
}
