//! Command line argument parsing for the Sentix CLI using clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::SentixConfig;
use crate::error::Result;
use crate::explain::Backend;

/// Sentix - sentiment classification of retail transactions with LIME and SHAP explanations
#[derive(Parser, Debug, Clone)]
#[command(name = "sentix")]
#[command(about = "Train a sentiment classifier on transaction descriptions and explain its predictions")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SentixArgs {
    /// Sentence to classify and explain; without it the run stops after evaluation
    #[arg(short, long, value_name = "TEXT")]
    pub text: Option<String>,

    /// Explanation method
    #[arg(short, long, value_enum, default_value = "ambos")]
    pub method: ExplainMethod,

    /// CSV dataset path (overrides the configuration)
    #[arg(short, long, value_name = "CSV_FILE")]
    pub data: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Where to write the LIME HTML report
    #[arg(long, value_name = "HTML_FILE")]
    pub lime_output: Option<PathBuf>,

    /// Number of words in the LIME explanation
    #[arg(short = 'k', long)]
    pub num_features: Option<usize>,

    /// Seed for LIME sampling (unseeded by default)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Verbosity level (0=quiet, 1=normal, 2=debug, 3=trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl SentixArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n + 1,
            }
        }
    }

    /// The sentence to explain, if one was given.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// Configuration file (or defaults) with the command line overrides applied.
    pub fn resolve_config(&self) -> Result<SentixConfig> {
        let mut config = match &self.config {
            Some(path) => SentixConfig::load_from_file(path)?,
            None => SentixConfig::default(),
        };

        if let Some(data) = &self.data {
            config.data.path = data.clone();
        }
        if let Some(path) = &self.lime_output {
            config.lime.output_path = path.clone();
        }
        if let Some(k) = self.num_features {
            config.lime.num_features = k;
        }
        if let Some(seed) = self.seed {
            config.lime.seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Which explanations to produce for `--text`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplainMethod {
    /// LIME only
    Lime,
    /// SHAP only
    Shap,
    /// LIME, then SHAP
    #[value(alias = "both")]
    Ambos,
}

impl ExplainMethod {
    /// Backends to run, in order.
    pub fn backends(&self) -> Vec<Backend> {
        match self {
            ExplainMethod::Lime => vec![Backend::Lime],
            ExplainMethod::Shap => vec![Backend::Shap],
            ExplainMethod::Ambos => vec![Backend::Lime, Backend::Shap],
        }
    }
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
