//! # Sentix
//!
//! Sentiment classification of retail transaction descriptions with local
//! explanations.
//!
//! ## Pipeline
//!
//! - Load a Latin-1 CSV export and label each row from its quantity
//! - Clean Portuguese descriptions (punctuation, stop words, RSLP stemming)
//! - Fit TF-IDF plus multinomial logistic regression and report held-out metrics
//! - Explain single predictions with LIME or SHAP

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod explain;
pub mod model;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
