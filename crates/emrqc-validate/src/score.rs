#![deny(unsafe_code)]

use emrqc_model::{MAX_SCORE, QcVerdict, ScoreConfig, ValidationIssue};

/// Combine all issues into the final verdict.
///
/// Starts from the fixed maximum, deducts the configured weight per issue,
/// floors at zero. Qualification is inclusive: a score exactly at the
/// threshold passes. Pure and order-independent over the issue list.
pub fn aggregate(issues: Vec<ValidationIssue>, config: &ScoreConfig) -> QcVerdict {
    let deduction: f64 = issues
        .iter()
        .map(|issue| config.weights.weight(issue.severity))
        .sum();
    let total_score = (MAX_SCORE - deduction).max(0.0);
    QcVerdict {
        total_score,
        is_qualified: total_score >= config.qualification_threshold,
        issues,
    }
}
