#![deny(unsafe_code)]

//! QC report generation.
//!
//! Turns a pipeline outcome into a versioned JSON payload for the host
//! system to persist or display.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use emrqc_model::{Severity, ValidationIssue};
use emrqc_validate::{MedicalValidationReport, QcOutcome, generate_report};

pub const REPORT_SCHEMA: &str = "emrqc.qc-report";
pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct QcReportPayload {
    pub schema: &'static str,
    pub schema_version: u32,
    pub generated_at: String,
    pub document_id: String,
    pub snapshot_fingerprint: String,
    pub total_score: f64,
    pub is_qualified: bool,
    pub minor_count: usize,
    pub major_count: usize,
    pub critical_count: usize,
    pub issues: Vec<IssueJson>,
    pub medical: MedicalValidationReport,
}

#[derive(Debug, Serialize)]
pub struct IssueJson {
    pub severity: Severity,
    pub indicator: Option<String>,
    pub rule_id: Option<String>,
    pub category: Option<String>,
    pub message: String,
    pub suggestion: Option<String>,
}

impl From<&ValidationIssue> for IssueJson {
    fn from(issue: &ValidationIssue) -> Self {
        Self {
            severity: issue.severity,
            indicator: issue.indicator.clone(),
            rule_id: issue.rule_id.clone(),
            category: issue.category.clone(),
            message: issue.message.clone(),
            suggestion: issue.suggestion.clone(),
        }
    }
}

/// Assemble the report payload. `generated_at` is injected so callers (and
/// tests) control the timestamp; [`write_qc_report_json`] stamps the
/// current time.
pub fn build_qc_report(
    document_id: &str,
    snapshot_fingerprint: &str,
    outcome: &QcOutcome,
    generated_at: String,
) -> QcReportPayload {
    QcReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at,
        document_id: document_id.to_string(),
        snapshot_fingerprint: snapshot_fingerprint.to_string(),
        total_score: outcome.verdict.total_score,
        is_qualified: outcome.verdict.is_qualified,
        minor_count: outcome.verdict.minor_count(),
        major_count: outcome.verdict.major_count(),
        critical_count: outcome.verdict.critical_count(),
        issues: outcome.verdict.issues.iter().map(IssueJson::from).collect(),
        medical: generate_report(&outcome.medical),
    }
}

/// Write the report as pretty JSON under `output_dir`, returning the path.
pub fn write_qc_report_json(
    output_dir: &Path,
    document_id: &str,
    snapshot_fingerprint: &str,
    outcome: &QcOutcome,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("create report dir: {}", output_dir.display()))?;
    let output_path = output_dir.join(format!("{document_id}_qc_report.json"));
    let payload = build_qc_report(
        document_id,
        snapshot_fingerprint,
        outcome,
        Utc::now().to_rfc3339(),
    );
    let json = serde_json::to_string_pretty(&payload)?;
    std::fs::write(&output_path, format!("{json}\n"))
        .with_context(|| format!("write report: {}", output_path.display()))?;
    Ok(output_path)
}
