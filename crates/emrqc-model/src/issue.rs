use serde::{Deserialize, Serialize};

/// Issue severity, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Major,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Major => "major",
            Severity::Critical => "critical",
        }
    }

    /// Parse a severity from rule-catalog text (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "minor" | "warning" | "warn" => Some(Severity::Minor),
            "major" | "error" => Some(Severity::Major),
            "critical" | "reject" => Some(Severity::Critical),
            _ => None,
        }
    }
}

/// A single reported defect. Uniform across the medical validator and the
/// content-rule evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Indicator name, for issues raised against an extracted indicator.
    pub indicator: Option<String>,
    /// Rule identifier, for issues raised by a content rule.
    pub rule_id: Option<String>,
    /// Check category (e.g. "Range", "Unit", "required_field").
    pub category: Option<String>,
    pub message: String,
    pub severity: Severity,
    /// Optional remediation hint shown alongside the issue.
    pub suggestion: Option<String>,
}

/// Terminal output of one pipeline execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcVerdict {
    pub total_score: f64,
    pub is_qualified: bool,
    pub issues: Vec<ValidationIssue>,
}

impl QcVerdict {
    pub fn minor_count(&self) -> usize {
        self.count(Severity::Minor)
    }

    pub fn major_count(&self) -> usize {
        self.count(Severity::Major)
    }

    pub fn critical_count(&self) -> usize {
        self.count(Severity::Critical)
    }

    pub fn has_critical(&self) -> bool {
        self.critical_count() > 0
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }
}
