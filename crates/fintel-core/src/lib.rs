//! Core library for financial document analytics.
//!
//! This crate provides:
//! - a static registry of document types and their field schemas
//! - extraction prompt construction for the external vision-model engine
//! - bounded subprocess invocation of the engine
//! - best-effort recovery of structured JSON from free-form engine output
//! - tabular aggregation, summary metrics, chart series, and CSV reports

pub mod analyzer;
pub mod config;
pub mod engine;
pub mod error;
pub mod prompt;
pub mod sanitize;
pub mod schema;
pub mod table;

pub use analyzer::{Analysis, Analyzer, DocumentSource, InputDocument};
pub use config::{FintelConfig, ServerConfig};
pub use engine::{EngineConfig, OcrEngine};
pub use error::{EngineError, ExtractionError, FintelError, Result};
pub use prompt::{build_prompt, ExtractionRequest};
pub use sanitize::{sanitize, FieldValues};
pub use schema::{ColorScale, DocumentSchema, DocumentType};
pub use table::{aggregate, Aggregation, ExtractionResult, FieldShare, FieldTotal, Metric, ResultTable, Row};
