//! Dashboard route handlers and the JSON API surface.

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::sync::atomic::Ordering;
use tracing::{debug, error, warn};

use fintel_core::{
    Analysis, Analyzer, DocumentType, EngineError, ExtractionError, FieldShare, FieldTotal,
    FintelError, InputDocument, Metric, OcrEngine, ResultTable,
};

use crate::server::AppState;
use crate::ui::DASHBOARD_HTML;

/// Errors surfaced to the browser as JSON; never a bare 500.
///
/// `warnings` carries the per-document notices of a failed batch, so
/// the page can still tell the user what happened to each upload.
pub struct ApiError {
    status: StatusCode,
    message: String,
    warnings: Vec<String>,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            warnings: Vec::new(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            warnings: Vec::new(),
        }
    }
}

impl From<FintelError> for ApiError {
    fn from(error: FintelError) -> Self {
        let message = error.to_string();
        let (status, warnings) = match error {
            // Missing credential is a deployment problem, not a bad request.
            FintelError::Engine(EngineError::MissingCredential(_)) | FintelError::Config(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, Vec::new())
            }
            FintelError::BatchEmpty { warnings } => (StatusCode::UNPROCESSABLE_ENTITY, warnings),
            FintelError::Extraction(ExtractionError::NoData { skipped: _ }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Vec::new())
            }
            other => {
                error!(error = %other, "analysis failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Vec::new())
            }
        };
        Self {
            status,
            message,
            warnings,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "error": self.message, "warnings": self.warnings })),
        )
            .into_response()
    }
}

/// Everything the dashboard page needs after an analysis run.
#[derive(Debug, Serialize)]
pub struct DashboardPayload {
    pub doc_type: String,
    pub color_scale: String,
    pub metrics: Vec<Metric>,
    pub proportions: Vec<FieldShare>,
    pub totals: Vec<FieldTotal>,
    pub table: ResultTable,
    pub warnings: Vec<String>,
}

impl DashboardPayload {
    pub fn from_analysis(analysis: &Analysis) -> Self {
        let table = &analysis.table;
        Self {
            doc_type: table.doc_type.name().to_string(),
            color_scale: table.doc_type.schema().color_scale.as_str().to_string(),
            metrics: table.headline_metrics(),
            proportions: table.proportions(),
            totals: table.column_sums(),
            table: table.clone(),
            warnings: analysis.warnings.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SchemaInfo {
    pub name: &'static str,
    pub fields: &'static [&'static str],
    pub color_scale: &'static str,
}

/// The embedded dashboard page.
pub async fn index() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// Document types, their fields, and color scales for the selector.
pub async fn schemas() -> Json<Vec<SchemaInfo>> {
    let schemas = DocumentType::ALL
        .iter()
        .map(|t| {
            let schema = t.schema();
            SchemaInfo {
                name: schema.name,
                fields: schema.fields,
                color_scale: schema.color_scale.as_str(),
            }
        })
        .collect();
    Json(schemas)
}

/// Progress of the in-flight batch, `{done, total}`.
pub async fn progress(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "done": state.progress.done.load(Ordering::Relaxed),
        "total": state.progress.total.load(Ordering::Relaxed),
    }))
}

fn is_supported_image(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    lower.ends_with(".png") || lower.ends_with(".jpg") || lower.ends_with(".jpeg")
}

/// Run one analyze action: `doc_type` field plus one or more PNG/JPEG
/// image parts, processed strictly in upload order.
pub async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DashboardPayload>, ApiError> {
    let mut doc_type: Option<DocumentType> = None;
    let mut documents: Vec<InputDocument> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid upload: {e}")))?
    {
        if field.name() == Some("doc_type") {
            let text = field
                .text()
                .await
                .map_err(|e| ApiError::bad_request(format!("invalid doc_type field: {e}")))?;
            doc_type = Some(text.parse().map_err(|e: String| ApiError::bad_request(e))?);
            continue;
        }

        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if !is_supported_image(&file_name) {
            return Err(ApiError::bad_request(format!(
                "unsupported file '{file_name}': only PNG and JPEG images are accepted"
            )));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("failed to read '{file_name}': {e}")))?;
        documents.push(InputDocument::from_bytes(file_name, bytes.to_vec()));
    }

    let doc_type = doc_type.ok_or_else(|| ApiError::bad_request("missing doc_type field"))?;
    if documents.is_empty() {
        return Err(ApiError::bad_request("no images uploaded"));
    }

    // Credential is resolved before any document is touched, so a
    // missing key surfaces as one configuration error up front.
    let engine = OcrEngine::from_env(state.config.engine.clone()).map_err(FintelError::from)?;
    let analyzer = Analyzer::new(engine, doc_type);

    state.progress.total.store(documents.len(), Ordering::Relaxed);
    state.progress.done.store(0, Ordering::Relaxed);

    let progress = state.progress.clone();
    let analysis = analyzer
        .run(&documents, |done, name| {
            debug!(done, document = name, "document finished");
            progress.done.store(done, Ordering::Relaxed);
        })
        .await
        .map_err(|e| {
            // A failed batch leaves the previous dashboard state intact.
            warn!(error = %e, "batch produced no table");
            ApiError::from(e)
        })?;

    let payload = DashboardPayload::from_analysis(&analysis);
    *state.session.write().await = Some(analysis);

    Ok(Json(payload))
}

/// The current session table, if an analysis has completed.
pub async fn table(State(state): State<AppState>) -> Result<Json<DashboardPayload>, ApiError> {
    let session = state.session.read().await;
    match session.as_ref() {
        Some(analysis) => Ok(Json(DashboardPayload::from_analysis(analysis))),
        None => Err(ApiError::not_found("no analysis has been run yet")),
    }
}

/// CSV report download for the current session table.
pub async fn report_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let session = state.session.read().await;
    let Some(analysis) = session.as_ref() else {
        return Err(ApiError::not_found("no analysis has been run yet"));
    };

    let csv = analysis.table.to_csv().map_err(ApiError::from)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        analysis.table.report_filename()
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintel_core::{aggregate, ExtractionResult};
    use pretty_assertions::assert_eq;

    fn sample_analysis() -> Analysis {
        let results = vec![ExtractionResult {
            document: "a.png".to_string(),
            values: [("Invoice Amount".to_string(), 500.0)].into_iter().collect(),
        }];
        let aggregation = aggregate(DocumentType::Invoice, results).unwrap();
        Analysis {
            table: aggregation.table,
            warnings: vec![],
        }
    }

    #[test]
    fn payload_carries_metrics_and_color_scale() {
        let payload = DashboardPayload::from_analysis(&sample_analysis());
        assert_eq!(payload.doc_type, "Invoice");
        assert_eq!(payload.color_scale, "Oranges");
        assert_eq!(payload.metrics[0].label, "Total Invoice Amount");
        assert_eq!(payload.metrics[0].value, 500.0);
        assert_eq!(payload.table.columns[0], "Document");
    }

    #[test]
    fn supported_image_extensions() {
        assert!(is_supported_image("scan.PNG"));
        assert!(is_supported_image("slip.jpeg"));
        assert!(!is_supported_image("report.pdf"));
        assert!(!is_supported_image("noext"));
    }

    #[test]
    fn error_status_mapping() {
        let missing = ApiError::from(FintelError::Engine(EngineError::MissingCredential(
            "GROQ_API_KEY".to_string(),
        )));
        assert_eq!(missing.status, StatusCode::SERVICE_UNAVAILABLE);

        let empty = ApiError::from(FintelError::Extraction(ExtractionError::NoData {
            skipped: vec![],
        }));
        assert_eq!(empty.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn failed_batch_response_keeps_per_document_notices() {
        let failed = ApiError::from(FintelError::BatchEmpty {
            warnings: vec![
                "a.png: engine error: OCR engine timed out after 60s".to_string(),
                "b.png: extraction error: no structured data recovered from b.png".to_string(),
            ],
        });
        assert_eq!(failed.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(failed.message, "no data extracted from any document in the batch");
        assert_eq!(failed.warnings.len(), 2);
        assert!(failed.warnings[0].contains("a.png"));
    }
}
