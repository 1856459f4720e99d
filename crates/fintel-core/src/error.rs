//! Error types for the fintel-core library.

use thiserror::Error;

/// Main error type for the fintel library.
#[derive(Error, Debug)]
pub enum FintelError {
    /// OCR engine invocation error.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// Extraction / aggregation error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// The whole batch failed; carries the per-document notices so they
    /// stay visible alongside the overall failure.
    #[error("no data extracted from any document in the batch")]
    BatchEmpty { warnings: Vec<String> },

    /// Report serialization error.
    #[error("report error: {0}")]
    Report(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while invoking the external OCR engine.
///
/// All of these are per-document: the batch runner records them as
/// warnings and moves on to the next document.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The API credential environment variable is not set.
    #[error("{0} is not set; configure the OCR engine credential")]
    MissingCredential(String),

    /// The engine process exited with a non-zero status.
    #[error("OCR engine exited with status {status:?}: {stderr}")]
    Failed {
        status: Option<i32>,
        stderr: String,
    },

    /// The engine process exceeded the invocation timeout.
    #[error("OCR engine timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The engine process could not be spawned or produced no output.
    #[error("failed to run OCR engine: {0}")]
    Spawn(String),
}

/// Errors related to turning engine output into table rows.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The sanitizer recovered no structured data for one document.
    #[error("no structured data recovered from {document}")]
    Empty { document: String },

    /// No document in the whole batch yielded a result. Carries the
    /// names of documents whose extraction came back empty.
    #[error("no data extracted from any document in the batch")]
    NoData { skipped: Vec<String> },
}

/// Result type for the fintel library.
pub type Result<T> = std::result::Result<T, FintelError>;
