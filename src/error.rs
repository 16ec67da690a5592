//! Error types for Sentix.
//!
//! All fallible operations in the crate return [`Result`], whose error type is
//! the [`SentixError`] enum. The variants separate problems with the input
//! file, problems with the labeled data, model fitting problems and
//! explanation problems, so the CLI can surface a clear message for each.
//!
//! # Examples
//!
//! ```
//! use sentix::error::{Result, SentixError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SentixError::input("Missing column: Quantity"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Sentix operations.
#[derive(Error, Debug)]
pub enum SentixError {
    /// I/O errors (reading the dataset, writing reports)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV decoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Input errors: missing file, missing columns, empty dataset, bad config
    #[error("Input error: {0}")]
    Input(String),

    /// Data errors: the labeled data cannot support the requested operation
    #[error("Data error: {0}")]
    Data(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Model fitting or prediction errors
    #[error("Model error: {0}")]
    Model(String),

    /// Explanation backend errors
    #[error("Explanation error: {0}")]
    Explanation(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SentixError.
pub type Result<T> = std::result::Result<T, SentixError>;

impl SentixError {
    /// Create a new input error.
    pub fn input<S: Into<String>>(msg: S) -> Self {
        SentixError::Input(msg.into())
    }

    /// Create a new data error.
    pub fn data<S: Into<String>>(msg: S) -> Self {
        SentixError::Data(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SentixError::Analysis(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        SentixError::Model(msg.into())
    }

    /// Create a new explanation error.
    pub fn explanation<S: Into<String>>(msg: S) -> Self {
        SentixError::Explanation(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SentixError::Other(msg.into())
    }

    /// Error for an explanation backend this build does not include.
    pub fn backend_unavailable(backend: &str) -> Self {
        SentixError::Explanation(format!(
            "{backend} backend is not available: sentix was built without the `{}` feature",
            backend.to_lowercase()
        ))
    }

    /// Whether this error was caused by the input file or configuration.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SentixError::Input(_) | SentixError::Io(_) | SentixError::Csv(_)
        )
    }

    /// Whether this error was caused by the labeled data.
    pub fn is_data_error(&self) -> bool {
        matches!(self, SentixError::Data(_))
    }
}
