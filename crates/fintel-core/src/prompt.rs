//! Extraction request construction.
//!
//! The prompt is the only channel constraining the engine's output shape:
//! there is no structural validation against the schema once output comes
//! back, so the wording here (exact field list, target JSON shape, "no
//! currency symbols", "default to 0") materially affects downstream
//! reliability.

use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::schema::DocumentSchema;

/// Build the extraction instruction for a field list.
///
/// Embeds a target JSON shape mapping each field name to the literal
/// string `"number"`, serialized in schema order.
pub fn build_prompt(fields: &[&str]) -> String {
    let shape: serde_json::Map<String, Value> = fields
        .iter()
        .map(|field| ((*field).to_string(), Value::String("number".to_string())))
        .collect();
    let shape_json = Value::Object(shape).to_string();

    format!(
        "Analyze this document image. Extract the following fields: {}. \
         Return the output strictly as a valid JSON object with this structure: {}. \
         Do not include currency symbols (like $, \u{20b9}) or commas in the numbers. \
         If a field is not found in the document, set its value to 0.",
        fields.join(", "),
        shape_json
    )
}

/// One extraction request: built per document, dropped once the
/// invocation completes.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Path to the (possibly temporary) image file.
    pub image_path: PathBuf,
    /// Fields requested from the active schema.
    pub fields: &'static [&'static str],
    /// The instruction sent to the engine.
    pub prompt: String,
}

impl ExtractionRequest {
    pub fn new(image_path: &Path, schema: &'static DocumentSchema) -> Self {
        Self {
            image_path: image_path.to_path_buf(),
            fields: schema.fields,
            prompt: build_prompt(schema.fields),
        }
    }
}
