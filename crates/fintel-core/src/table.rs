//! Tabular aggregation of per-document extraction results.
//!
//! One row per document, columns = `Document` plus the schema's fields
//! in schema order. The table also carries the presentation layer's
//! derivations: column sums, headline metrics, chart series, and the
//! CSV report.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::sanitize::FieldValues;
use crate::schema::DocumentType;

/// Sanitized extraction output for one document.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// The uploaded file's name.
    pub document: String,
    /// Field name to numeric value; may be empty on extraction failure.
    pub values: FieldValues,
}

/// One table row: document name plus values in schema field order.
#[derive(Debug, Clone, Serialize)]
pub struct Row {
    pub document: String,
    pub values: Vec<f64>,
}

/// Aggregated results for one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct ResultTable {
    pub doc_type: DocumentType,
    /// `Document` followed by the schema's fields.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Aggregation output: the table plus the documents skipped because
/// their extraction came back empty.
#[derive(Debug)]
pub struct Aggregation {
    pub table: ResultTable,
    /// Document names excluded from the table (non-fatal warnings).
    pub skipped: Vec<String>,
}

/// A headline metric derived from one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: f64,
}

/// Per-field total, used by the magnitude (bar) chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldTotal {
    pub field: String,
    pub total: f64,
}

/// Per-field share of the non-zero total, used by the proportion chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldShare {
    pub field: String,
    pub total: f64,
    /// Fraction of the sum over non-zero fields, in `0.0..=1.0`.
    pub share: f64,
}

/// Merge per-document results into one table.
///
/// Documents whose value map is empty are excluded and reported in
/// [`Aggregation::skipped`], not inserted as zero-rows. An all-empty
/// batch is an overall failure ([`ExtractionError::NoData`]), never a
/// silently empty table.
pub fn aggregate(
    doc_type: DocumentType,
    results: Vec<ExtractionResult>,
) -> Result<Aggregation, ExtractionError> {
    let schema = doc_type.schema();
    let mut rows = Vec::with_capacity(results.len());
    let mut skipped = Vec::new();

    for result in results {
        if result.values.is_empty() {
            warn!(document = %result.document, "no structured data recovered; skipping");
            skipped.push(result.document);
            continue;
        }
        rows.push(build_row(schema.fields, result));
    }

    if rows.is_empty() {
        return Err(ExtractionError::NoData { skipped });
    }

    let mut columns = Vec::with_capacity(schema.fields.len() + 1);
    columns.push("Document".to_string());
    columns.extend(schema.fields.iter().map(|f| f.to_string()));

    Ok(Aggregation {
        table: ResultTable { doc_type, columns, rows },
        skipped,
    })
}

/// Build one row, enforcing the schema shape explicitly: fields the
/// engine omitted become 0, keys outside the schema are dropped.
fn build_row(fields: &[&str], result: ExtractionResult) -> Row {
    for key in result.values.keys() {
        if !fields.contains(&key.as_str()) {
            debug!(document = %result.document, field = %key, "dropping field outside schema");
        }
    }
    let values = fields
        .iter()
        .map(|field| result.values.get(*field).copied().unwrap_or(0.0))
        .collect();
    Row {
        document: result.document,
        values,
    }
}

impl ResultTable {
    /// Per-field column sums, in column order.
    pub fn column_sums(&self) -> Vec<FieldTotal> {
        self.columns
            .iter()
            .skip(1) // Document
            .enumerate()
            .map(|(i, field)| FieldTotal {
                field: field.clone(),
                total: self.rows.iter().map(|r| r.values[i]).sum(),
            })
            .collect()
    }

    /// Headline metrics: the first four numeric columns by table order.
    pub fn headline_metrics(&self) -> Vec<Metric> {
        self.column_sums()
            .into_iter()
            .take(4)
            .map(|t| Metric {
                label: format!("Total {}", t.field),
                value: t.total,
            })
            .collect()
    }

    /// Proportion series over fields with a non-zero positive total.
    pub fn proportions(&self) -> Vec<FieldShare> {
        let totals: Vec<FieldTotal> = self
            .column_sums()
            .into_iter()
            .filter(|t| t.total > 0.0)
            .collect();
        let sum: f64 = totals.iter().map(|t| t.total).sum();
        totals
            .into_iter()
            .map(|t| FieldShare {
                share: if sum > 0.0 { t.total / sum } else { 0.0 },
                field: t.field,
                total: t.total,
            })
            .collect()
    }

    /// Serialize the table as a UTF-8 CSV report: header row, one data
    /// row per document, plain numbers, no index column.
    pub fn to_csv(&self) -> crate::error::Result<String> {
        let mut writer = csv::Writer::from_writer(vec![]);

        writer.write_record(&self.columns)?;
        for row in &self.rows {
            let mut record = Vec::with_capacity(self.columns.len());
            record.push(row.document.clone());
            record.extend(row.values.iter().map(|v| format_number(*v)));
            writer.write_record(&record)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| std::io::Error::other(e.to_string()).into())
    }

    /// Report file name for downloads, e.g. `fintel_invoice_report.csv`.
    pub fn report_filename(&self) -> String {
        format!(
            "fintel_{}_report.csv",
            self.doc_type.name().to_lowercase().replace(' ', "_")
        )
    }
}

/// Plain, locale-independent number formatting: integral values print
/// without a decimal point.
fn format_number(value: f64) -> String {
    format!("{}", value)
}
