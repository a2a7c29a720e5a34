#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use emrqc_model::{CheckType, ContentRule, RuleCondition, Severity};

use crate::error::CatalogError;

/// Source form of a content rule as supplied by the rule catalog.
///
/// `condition` stays raw JSON here; it is parsed into the closed
/// [`RuleCondition`] set during load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRuleSource {
    #[serde(default)]
    pub id: Option<u64>,
    pub document_type: String,
    pub section: String,
    pub check_type: String,
    pub condition: Value,
    pub error_message: String,
    pub severity: String,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// The active rule catalog for one knowledge snapshot. Rules are held in
/// ascending-id order so evaluation output is reproducible.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<ContentRule>,
    unsupported: usize,
}

impl RuleSet {
    /// Parse and index the rule catalog. A structurally malformed rule
    /// (missing fields, bad severity, recognized condition with a broken
    /// shape) fails the load; an unrecognized condition kind is retained
    /// as [`RuleCondition::Unsupported`] and surfaced at evaluation.
    pub fn load(sources: &[ContentRuleSource]) -> Result<Self, CatalogError> {
        let mut rules = Vec::with_capacity(sources.len());
        let mut unsupported = 0usize;

        for (index, source) in sources.iter().enumerate() {
            if source.document_type.trim().is_empty() {
                return Err(CatalogError::malformed_rule(index, "missing documentType"));
            }
            if source.section.trim().is_empty() {
                return Err(CatalogError::malformed_rule(index, "missing section"));
            }
            if source.error_message.trim().is_empty() {
                return Err(CatalogError::malformed_rule(index, "missing errorMessage"));
            }
            let Some(check_type) = CheckType::parse(&source.check_type) else {
                return Err(CatalogError::malformed_rule(
                    index,
                    format!("unknown checkType '{}'", source.check_type),
                ));
            };
            let Some(severity) = Severity::parse(&source.severity) else {
                return Err(CatalogError::malformed_rule(
                    index,
                    format!("unknown severity '{}'", source.severity),
                ));
            };

            let condition = parse_condition(index, &source.condition)?;
            if let RuleCondition::Unsupported { condition_type } = &condition {
                unsupported += 1;
                warn!(
                    rule = index,
                    condition_type, "rule condition not evaluable; will surface as an issue"
                );
            }

            rules.push(ContentRule {
                id: source.id.unwrap_or(index as u64 + 1),
                document_type: source.document_type.trim().to_string(),
                section: source.section.trim().to_string(),
                check_type,
                condition,
                error_message: source.error_message.trim().to_string(),
                severity,
                suggestion: source.suggestion.clone(),
                is_active: source.is_active,
            });
        }

        rules.sort_by_key(|rule| rule.id);
        info!(rules = rules.len(), unsupported, "content rules loaded");
        Ok(Self { rules, unsupported })
    }

    /// All rules targeting a document type, ascending id. Active filtering
    /// is the evaluator's job.
    pub fn rules_for(&self, document_type: &str) -> impl Iterator<Item = &ContentRule> {
        self.rules
            .iter()
            .filter(move |rule| rule.document_type == document_type)
    }

    pub fn rules(&self) -> &[ContentRule] {
        &self.rules
    }

    pub fn unsupported_count(&self) -> usize {
        self.unsupported
    }
}

/// Parse a condition JSON object into the closed condition set.
///
/// Known `type` values with a broken shape are load errors; an unknown
/// `type` (or a missing one) becomes `Unsupported` so the rule is rejected
/// loudly at evaluation instead of silently never firing.
fn parse_condition(index: usize, value: &Value) -> Result<RuleCondition, CatalogError> {
    let Some(object) = value.as_object() else {
        return Err(CatalogError::malformed_rule(
            index,
            "condition is not a JSON object",
        ));
    };
    let condition_type = object
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string();

    match condition_type.as_str() {
        "must_contain_entity" => {
            let entity_type = require_str(index, object, "entityType")?;
            let min_count = object
                .get("minCount")
                .and_then(Value::as_u64)
                .unwrap_or(1) as usize;
            Ok(RuleCondition::MustContainEntity {
                entity_type,
                min_count,
            })
        }
        "must_contain_duration" => {
            let section = require_str(index, object, "section")?;
            Ok(RuleCondition::MustContainDuration { section })
        }
        "must_not_be_generic" => {
            let phrases = object
                .get("genericPhrases")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    CatalogError::malformed_rule(
                        index,
                        "must_not_be_generic condition has no genericPhrases list",
                    )
                })?;
            let generic_phrases: Vec<String> = phrases
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|phrase| !phrase.is_empty())
                .map(str::to_string)
                .collect();
            if generic_phrases.is_empty() {
                return Err(CatalogError::malformed_rule(
                    index,
                    "must_not_be_generic condition has an empty genericPhrases list",
                ));
            }
            Ok(RuleCondition::MustNotBeGeneric { generic_phrases })
        }
        other => Ok(RuleCondition::Unsupported {
            condition_type: if other.is_empty() {
                "<missing>".to_string()
            } else {
                other.to_string()
            },
        }),
    }
}

fn require_str(
    index: usize,
    object: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<String, CatalogError> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            CatalogError::malformed_rule(index, format!("condition is missing '{key}'"))
        })
}
