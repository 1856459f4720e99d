//! Sequential batch runner: one analyze action, documents processed
//! strictly in upload order, each blocking until its invocation returns
//! or times out.
//!
//! Every per-document failure is recovered here and surfaced as a
//! warning; only an empty batch result propagates as an error.

use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::engine::OcrEngine;
use crate::error::{ExtractionError, FintelError, Result};
use crate::prompt::ExtractionRequest;
use crate::sanitize::sanitize;
use crate::schema::DocumentType;
use crate::table::{aggregate, Aggregation, ExtractionResult, ResultTable};

/// Where a document's image bytes live.
#[derive(Debug)]
pub enum DocumentSource {
    /// An existing file on disk (CLI path).
    Path(PathBuf),
    /// Uploaded bytes; written to a scoped temporary file for the
    /// duration of the invocation (dashboard path).
    Bytes(Vec<u8>),
}

/// One document queued for analysis.
#[derive(Debug)]
pub struct InputDocument {
    /// Display name, usually the uploaded file's name.
    pub name: String,
    pub source: DocumentSource,
}

impl InputDocument {
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            source: DocumentSource::Path(path),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            source: DocumentSource::Bytes(bytes),
        }
    }
}

/// Outcome of one analysis run.
#[derive(Debug)]
pub struct Analysis {
    pub table: ResultTable,
    /// Per-document notices: engine failures and empty extractions.
    pub warnings: Vec<String>,
}

/// Runs extraction batches for one document type.
#[derive(Debug, Clone)]
pub struct Analyzer {
    engine: OcrEngine,
    doc_type: DocumentType,
}

impl Analyzer {
    pub fn new(engine: OcrEngine, doc_type: DocumentType) -> Self {
        Self { engine, doc_type }
    }

    pub fn doc_type(&self) -> DocumentType {
        self.doc_type
    }

    /// Process one document image already on disk.
    ///
    /// The returned value map may be empty; the aggregator decides how
    /// to report that.
    pub async fn process_path(&self, name: &str, path: &Path) -> Result<ExtractionResult> {
        let request = ExtractionRequest::new(path, self.doc_type.schema());
        let stdout = self.engine.invoke(&request.image_path, &request.prompt).await?;
        let values = sanitize(&stdout);
        info!(document = name, fields = values.len(), "document processed");
        Ok(ExtractionResult {
            document: name.to_string(),
            values,
        })
    }

    /// Process one document supplied as raw bytes.
    ///
    /// The bytes are written to a named temporary file that is removed
    /// when this function returns, on success and failure alike.
    pub async fn process_bytes(&self, name: &str, bytes: &[u8]) -> Result<ExtractionResult> {
        let suffix = Path::new(name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let mut tmp = tempfile::Builder::new()
            .prefix("fintel-upload-")
            .suffix(&suffix)
            .tempfile()?;
        tmp.write_all(bytes)?;
        tmp.flush()?;

        // `tmp` is dropped on every exit path, deleting the file.
        self.process_path(name, tmp.path()).await
    }

    /// Run the whole batch sequentially.
    ///
    /// `progress` is called after each document completes (successfully
    /// or not) with the number of documents finished so far.
    pub async fn run<F>(&self, documents: &[InputDocument], mut progress: F) -> Result<Analysis>
    where
        F: FnMut(usize, &str),
    {
        let mut results = Vec::with_capacity(documents.len());
        let mut warnings = Vec::new();

        for (index, document) in documents.iter().enumerate() {
            let outcome = match &document.source {
                DocumentSource::Path(path) => self.process_path(&document.name, path).await,
                DocumentSource::Bytes(bytes) => self.process_bytes(&document.name, bytes).await,
            };

            match outcome {
                Ok(result) => results.push(result),
                Err(error) => {
                    warn!(document = %document.name, %error, "document skipped");
                    warnings.push(format!("{}: {}", document.name, error));
                }
            }

            progress(index + 1, &document.name);
        }

        let Aggregation { table, skipped } = match aggregate(self.doc_type, results) {
            Ok(aggregation) => aggregation,
            // An all-empty batch is still an overall failure, but the
            // per-document notices explaining it must survive it.
            Err(ExtractionError::NoData { skipped }) => {
                warnings.extend(skipped.into_iter().map(empty_notice));
                return Err(FintelError::BatchEmpty { warnings });
            }
            Err(error) => return Err(error.into()),
        };
        warnings.extend(skipped.into_iter().map(empty_notice));

        Ok(Analysis { table, warnings })
    }
}

fn empty_notice(document: String) -> String {
    FintelError::from(ExtractionError::Empty { document }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineConfig, OcrEngine};
    use pretty_assertions::assert_eq;

    fn stub_analyzer(script: &str, timeout_secs: u64, doc_type: DocumentType) -> Analyzer {
        let config = EngineConfig {
            command: vec!["sh".to_string(), "-c".to_string(), script.to_string()],
            credential_var: "FINTEL_TEST_KEY".to_string(),
            timeout_secs,
        };
        Analyzer::new(OcrEngine::with_credential(config, "test-credential"), doc_type)
    }

    #[tokio::test]
    async fn batch_with_timeout_keeps_good_rows_and_warns() {
        // The stub answers for the first image and hangs for the second.
        // $0 is the temporary image path appended by the engine, so the
        // branch keys on the uploaded bytes.
        let script = r#"case "$(cat "$0")" in
            *slow*) sleep 30 ;;
            *) printf '{"Invoice Amount": 500, "Tax Amount": 50, "Total Amount": 550, "Discount Amount": 0}' ;;
        esac"#;
        let analyzer = stub_analyzer(script, 1, DocumentType::Invoice);

        let documents = vec![
            InputDocument::from_bytes("first.png", b"fast".to_vec()),
            InputDocument::from_bytes("slow.png", b"slow".to_vec()),
        ];

        let mut seen = Vec::new();
        let analysis = analyzer
            .run(&documents, |done, name| seen.push((done, name.to_string())))
            .await
            .unwrap();

        assert_eq!(analysis.table.rows.len(), 1);
        assert_eq!(analysis.table.rows[0].document, "first.png");
        assert_eq!(analysis.warnings.len(), 1);
        assert!(analysis.warnings[0].contains("slow.png"));
        assert!(analysis.warnings[0].contains("timed out"));
        assert_eq!(seen, vec![(1, "first.png".to_string()), (2, "slow.png".to_string())]);

        let metrics = analysis.table.headline_metrics();
        assert_eq!(metrics[0].label, "Total Invoice Amount");
        assert_eq!(metrics[0].value, 500.0);
    }

    #[tokio::test]
    async fn unparseable_output_becomes_a_warning() {
        let script = r#"case "$(cat "$0")" in
            *good*) printf '{"Revenue": 100}' ;;
            *) printf 'no structured output here' ;;
        esac"#;
        let analyzer = stub_analyzer(script, 5, DocumentType::ProfitAndLoss);

        let documents = vec![
            InputDocument::from_bytes("good.png", b"good".to_vec()),
            InputDocument::from_bytes("bad.png", b"bad".to_vec()),
        ];
        let analysis = analyzer.run(&documents, |_, _| {}).await.unwrap();

        assert_eq!(analysis.table.rows.len(), 1);
        assert_eq!(analysis.warnings.len(), 1);
        assert!(analysis.warnings[0].contains("bad.png"));
    }

    #[tokio::test]
    async fn failed_batch_still_carries_per_document_notices() {
        // One engine failure, one empty extraction: the batch errors,
        // but both documents must stay diagnosable.
        let script = r#"case "$(cat "$0")" in
            *empty*) printf 'nothing structured came back' ;;
            *) echo 'model unavailable' >&2; exit 2 ;;
        esac"#;
        let analyzer = stub_analyzer(script, 5, DocumentType::Invoice);
        let documents = vec![
            InputDocument::from_bytes("a.png", b"png".to_vec()),
            InputDocument::from_bytes("b.png", b"empty".to_vec()),
        ];

        match analyzer.run(&documents, |_, _| {}).await {
            Err(FintelError::BatchEmpty { warnings }) => {
                assert_eq!(warnings.len(), 2);
                assert!(warnings[0].contains("a.png"));
                assert!(warnings[0].contains("model unavailable"));
                assert!(warnings[1].contains("b.png"));
                assert!(warnings[1].contains("no structured data"));
            }
            other => panic!("expected BatchEmpty, got {:?}", other),
        }
    }

    #[test]
    fn input_document_name_from_path() {
        let doc = InputDocument::from_path(PathBuf::from("/tmp/scans/payslip.jpg"));
        assert_eq!(doc.name, "payslip.jpg");
    }
}
