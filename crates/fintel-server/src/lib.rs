//! Browser dashboard for financial document analytics.
//!
//! Serves an embedded single-page UI plus a small JSON API: upload
//! scanned documents, run a batch analysis, and read back metrics,
//! chart series, the raw table, and a CSV report.

mod routes;
mod server;
mod ui;

pub use server::{start_server, AppState};
