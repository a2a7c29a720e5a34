use serde::{Deserialize, Serialize};

use crate::Severity;

/// Top-level check category of a content rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    RequiredField,
    ForbiddenContent,
    FormatCheck,
    CrossReference,
}

impl CheckType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckType::RequiredField => "required_field",
            CheckType::ForbiddenContent => "forbidden_content",
            CheckType::FormatCheck => "format_check",
            CheckType::CrossReference => "cross_reference",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "required_field" => Some(CheckType::RequiredField),
            "forbidden_content" => Some(CheckType::ForbiddenContent),
            "format_check" => Some(CheckType::FormatCheck),
            "cross_reference" => Some(CheckType::CrossReference),
            _ => None,
        }
    }
}

/// Rule condition, parsed from the catalog's JSON DSL into a closed set of
/// shapes. A condition whose `type` is not recognized is retained as
/// `Unsupported` and surfaced at evaluation; it never becomes a silent
/// no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleCondition {
    /// The section must contain at least `min_count` non-negated symptom
    /// matches of the given category.
    MustContainEntity { entity_type: String, min_count: usize },
    /// The named section must contain a duration expression.
    MustContainDuration { section: String },
    /// The section must not contain any of the listed boilerplate phrases.
    MustNotBeGeneric { generic_phrases: Vec<String> },
    /// Recognized at load but not evaluable (unknown `type`, or a reserved
    /// shape such as the cross-reference family).
    Unsupported { condition_type: String },
}

/// A content rule scoped to one document type and section. Read-only
/// configuration for the lifetime of a validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRule {
    pub id: u64,
    pub document_type: String,
    pub section: String,
    pub check_type: CheckType,
    pub condition: RuleCondition,
    pub error_message: String,
    pub severity: Severity,
    pub suggestion: Option<String>,
    pub is_active: bool,
}

impl ContentRule {
    /// A rule applies when it is active and targets the given document type.
    pub fn applies_to(&self, document_type: &str) -> bool {
        self.is_active && self.document_type == document_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_type_round_trip() {
        for check_type in [
            CheckType::RequiredField,
            CheckType::ForbiddenContent,
            CheckType::FormatCheck,
            CheckType::CrossReference,
        ] {
            assert_eq!(CheckType::parse(check_type.as_str()), Some(check_type));
        }
        assert_eq!(CheckType::parse("other"), None);
    }

    #[test]
    fn condition_json_shape() {
        let condition = RuleCondition::MustContainDuration {
            section: "chief_complaint".to_string(),
        };
        let json = serde_json::to_value(&condition).expect("serialize condition");
        assert_eq!(json["type"], "must_contain_duration");
        assert_eq!(json["section"], "chief_complaint");
    }
}
