pub mod config;
pub mod document;
pub mod indicator;
pub mod issue;
pub mod rule;
pub mod term;

pub use config::{
    ConfigError, DEFAULT_QUALIFICATION_THRESHOLD, MAX_SCORE, ScoreConfig, SeverityWeights,
};
pub use document::Document;
pub use indicator::{Indicator, IndicatorKind};
pub use issue::{QcVerdict, Severity, ValidationIssue};
pub use rule::{CheckType, ContentRule, RuleCondition};
pub use term::{SymptomMatch, TermEntry, TermSource};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_counts() {
        let verdict = QcVerdict {
            total_score: 88.0,
            is_qualified: true,
            issues: vec![
                ValidationIssue {
                    indicator: Some("血压".to_string()),
                    rule_id: None,
                    category: Some("CrossField".to_string()),
                    message: "systolic below diastolic".to_string(),
                    severity: Severity::Minor,
                    suggestion: None,
                },
                ValidationIssue {
                    indicator: None,
                    rule_id: Some("12".to_string()),
                    category: Some("required_field".to_string()),
                    message: "主诉缺少持续时间描述".to_string(),
                    severity: Severity::Major,
                    suggestion: None,
                },
            ],
        };
        assert_eq!(verdict.minor_count(), 1);
        assert_eq!(verdict.major_count(), 1);
        assert_eq!(verdict.critical_count(), 0);
        assert!(!verdict.has_critical());
    }

    #[test]
    fn verdict_serializes() {
        let verdict = QcVerdict {
            total_score: 100.0,
            is_qualified: true,
            issues: vec![],
        };
        let json = serde_json::to_string(&verdict).expect("serialize verdict");
        let round: QcVerdict = serde_json::from_str(&json).expect("deserialize verdict");
        assert_eq!(round.total_score, 100.0);
        assert!(round.is_qualified);
    }
}
