#![deny(unsafe_code)]

use std::collections::BTreeMap;

use tracing::warn;

use emrqc_catalog::RuleSet;
use emrqc_extract::contains_duration;
use emrqc_model::{ContentRule, Document, RuleCondition, Severity, SymptomMatch, ValidationIssue};

/// Interprets the section-scoped content rules against a segmented
/// document. Rules run in ascending-id order (the order the rule set
/// stores them), so the issue list is reproducible across runs.
pub struct ContentRuleEvaluator<'a> {
    rules: &'a RuleSet,
}

impl<'a> ContentRuleEvaluator<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Evaluate every active rule for the document's type whose section is
    /// present. `section_matches` holds the symptom hits per section.
    pub fn evaluate(
        &self,
        document: &Document,
        section_matches: &BTreeMap<String, Vec<SymptomMatch>>,
    ) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for rule in self.rules.rules_for(&document.document_type) {
            if !rule.is_active {
                continue;
            }
            let Some(section_text) = document.section(&rule.section) else {
                continue;
            };
            match &rule.condition {
                RuleCondition::MustContainEntity {
                    entity_type,
                    min_count,
                } => {
                    let count = section_matches
                        .get(&rule.section)
                        .map(|hits| {
                            hits.iter()
                                .filter(|hit| !hit.negated && hit.category == *entity_type)
                                .count()
                        })
                        .unwrap_or(0);
                    if count < *min_count {
                        issues.push(rule_issue(rule));
                    }
                }
                RuleCondition::MustContainDuration { section } => {
                    // The condition names its own section; fall back to the
                    // rule's section when that one is absent.
                    let text = document.section(section).unwrap_or(section_text);
                    if !contains_duration(text) {
                        issues.push(rule_issue(rule));
                    }
                }
                RuleCondition::MustNotBeGeneric { generic_phrases } => {
                    if generic_phrases
                        .iter()
                        .any(|phrase| section_text.contains(phrase.as_str()))
                    {
                        issues.push(rule_issue(rule));
                    }
                }
                RuleCondition::Unsupported { condition_type } => {
                    warn!(
                        rule_id = rule.id,
                        condition_type, "rule condition unsupported; surfacing as issue"
                    );
                    issues.push(ValidationIssue {
                        indicator: None,
                        rule_id: Some(rule.id.to_string()),
                        category: Some("unsupported_condition".to_string()),
                        message: format!(
                            "rule {} has unsupported condition '{condition_type}' and was not \
                             evaluated",
                            rule.id
                        ),
                        severity: Severity::Minor,
                        suggestion: Some(
                            "update or deactivate the rule in the rule catalog".to_string(),
                        ),
                    });
                }
            }
        }
        issues
    }
}

fn rule_issue(rule: &ContentRule) -> ValidationIssue {
    ValidationIssue {
        indicator: None,
        rule_id: Some(rule.id.to_string()),
        category: Some(rule.check_type.as_str().to_string()),
        message: rule.error_message.clone(),
        severity: rule.severity,
        suggestion: rule.suggestion.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emrqc_catalog::ContentRuleSource;
    use emrqc_model::CheckType;
    use serde_json::json;

    fn rule_set(sources: Vec<ContentRuleSource>) -> RuleSet {
        RuleSet::load(&sources).expect("rule set")
    }

    fn duration_rule() -> ContentRuleSource {
        ContentRuleSource {
            id: Some(1),
            document_type: "admission_record".to_string(),
            section: "chief_complaint".to_string(),
            check_type: "required_field".to_string(),
            condition: json!({"type": "must_contain_duration", "section": "chief_complaint"}),
            error_message: "主诉缺少持续时间描述".to_string(),
            severity: "major".to_string(),
            suggestion: None,
            is_active: true,
        }
    }

    fn document(chief_complaint: &str) -> Document {
        Document::new("admission_record").with_section("chief_complaint", chief_complaint)
    }

    #[test]
    fn missing_duration_fires_rule() {
        let rules = rule_set(vec![duration_rule()]);
        let evaluator = ContentRuleEvaluator::new(&rules);
        let issues = evaluator.evaluate(&document("患者胸痛"), &BTreeMap::new());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "主诉缺少持续时间描述");
        assert_eq!(issues[0].severity, Severity::Major);
        assert_eq!(issues[0].rule_id.as_deref(), Some("1"));
    }

    #[test]
    fn present_duration_satisfies_rule() {
        let rules = rule_set(vec![duration_rule()]);
        let evaluator = ContentRuleEvaluator::new(&rules);
        let issues = evaluator.evaluate(&document("患者胸痛3天"), &BTreeMap::new());
        assert!(issues.is_empty());
    }

    #[test]
    fn inactive_rule_is_skipped() {
        let mut inactive = duration_rule();
        inactive.is_active = false;
        let rules = rule_set(vec![inactive]);
        let evaluator = ContentRuleEvaluator::new(&rules);
        let issues = evaluator.evaluate(&document("患者胸痛"), &BTreeMap::new());
        assert!(issues.is_empty());
    }

    #[test]
    fn absent_section_is_skipped() {
        let rules = rule_set(vec![duration_rule()]);
        let evaluator = ContentRuleEvaluator::new(&rules);
        let other = Document::new("admission_record").with_section("diagnosis", "冠心病");
        assert!(evaluator.evaluate(&other, &BTreeMap::new()).is_empty());
    }

    #[test]
    fn other_document_type_is_skipped() {
        let rules = rule_set(vec![duration_rule()]);
        let evaluator = ContentRuleEvaluator::new(&rules);
        let other = Document::new("progress_note").with_section("chief_complaint", "患者胸痛");
        assert!(evaluator.evaluate(&other, &BTreeMap::new()).is_empty());
    }

    #[test]
    fn negated_matches_do_not_satisfy_entity_rule() {
        let mut source = duration_rule();
        source.check_type = "required_field".to_string();
        source.condition = json!({"type": "must_contain_entity", "entityType": "症状", "minCount": 1});
        source.error_message = "主诉缺少症状描述".to_string();
        let rules = rule_set(vec![source]);
        let evaluator = ContentRuleEvaluator::new(&rules);

        let mut matches = BTreeMap::new();
        matches.insert(
            "chief_complaint".to_string(),
            vec![SymptomMatch {
                term_name: "胸痛".to_string(),
                category: "症状".to_string(),
                matched_alias: "胸痛".to_string(),
                span_start: 3,
                span_end: 9,
                negated: true,
            }],
        );
        let issues = evaluator.evaluate(&document("无胸痛"), &matches);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "主诉缺少症状描述");

        let mut matches = BTreeMap::new();
        matches.insert(
            "chief_complaint".to_string(),
            vec![SymptomMatch {
                term_name: "胸痛".to_string(),
                category: "症状".to_string(),
                matched_alias: "胸痛".to_string(),
                span_start: 0,
                span_end: 6,
                negated: false,
            }],
        );
        assert!(evaluator.evaluate(&document("胸痛3天"), &matches).is_empty());
    }

    #[test]
    fn generic_phrase_fires_rule() {
        let mut source = duration_rule();
        source.check_type = "forbidden_content".to_string();
        source.section = "present_illness".to_string();
        source.condition = json!({"type": "must_not_be_generic", "genericPhrases": ["病情同前", "详见病程"]});
        source.error_message = "现病史为套话描述".to_string();
        let rules = rule_set(vec![source]);
        let evaluator = ContentRuleEvaluator::new(&rules);

        let lazy = Document::new("admission_record")
            .with_section("present_illness", "病情同前，继续观察");
        let issues = evaluator.evaluate(&lazy, &BTreeMap::new());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].category.as_deref(), Some(CheckType::ForbiddenContent.as_str()));

        let detailed = Document::new("admission_record")
            .with_section("present_illness", "患者昨夜再发胸痛，持续约10分钟");
        assert!(evaluator.evaluate(&detailed, &BTreeMap::new()).is_empty());
    }

    #[test]
    fn unsupported_condition_surfaces_as_issue() {
        let mut source = duration_rule();
        source.check_type = "cross_reference".to_string();
        source.condition = json!({"type": "sections_consistent", "sections": ["diagnosis", "treatment_plan"]});
        let rules = rule_set(vec![source]);
        let evaluator = ContentRuleEvaluator::new(&rules);
        let issues = evaluator.evaluate(&document("患者胸痛3天"), &BTreeMap::new());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].category.as_deref(), Some("unsupported_condition"));
        assert!(issues[0].message.contains("sections_consistent"));
    }

    #[test]
    fn issues_come_back_in_rule_id_order() {
        let mut second = duration_rule();
        second.id = Some(9);
        second.section = "present_illness".to_string();
        second.condition = json!({"type": "must_contain_duration", "section": "present_illness"});
        second.error_message = "现病史缺少持续时间描述".to_string();
        let mut first = duration_rule();
        first.id = Some(2);
        let rules = rule_set(vec![second, first]);
        let evaluator = ContentRuleEvaluator::new(&rules);
        let doc = Document::new("admission_record")
            .with_section("chief_complaint", "患者胸痛")
            .with_section("present_illness", "间断胸痛，无明显诱因");
        let issues = evaluator.evaluate(&doc, &BTreeMap::new());
        let ids: Vec<&str> = issues
            .iter()
            .filter_map(|issue| issue.rule_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["2", "9"]);
    }
}
