#![deny(unsafe_code)]

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use emrqc_model::{Indicator, IndicatorKind, Severity, ValidationIssue};

/// Result of validating one batch of extracted indicators.
///
/// All issues carry the uniform warning-class severity; escalation, if
/// any, is the aggregator's concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicalValidationResult {
    pub indicators: Vec<Indicator>,
    pub total_indicators: usize,
    pub issues: Vec<ValidationIssue>,
    /// `max(1 - issues/indicators, 0)`; zero when nothing was extracted,
    /// so absence of data never reads as confidence.
    pub confidence: f64,
}

/// Plausible value bounds per indicator kind. Exhaustive: a new kind does
/// not compile until it gets an entry here.
pub fn plausible_range(kind: IndicatorKind) -> (f64, f64) {
    match kind {
        IndicatorKind::BloodPressure => (30.0, 300.0),
        IndicatorKind::HeartRate => (20.0, 250.0),
        IndicatorKind::Temperature => (30.0, 45.0),
        IndicatorKind::RespiratoryRate => (5.0, 60.0),
        IndicatorKind::OxygenSaturation => (0.0, 100.0),
        IndicatorKind::Glucose => (1.0, 40.0),
        IndicatorKind::Hemoglobin => (20.0, 250.0),
        IndicatorKind::WhiteCellCount => (0.1, 100.0),
        IndicatorKind::PlateletCount => (1.0, 1500.0),
    }
}

/// Accepted unit spellings per indicator kind. Comparison is exact:
/// `g/L` (grams) and `G/L` (giga counts) are different units.
pub fn accepted_units(kind: IndicatorKind) -> &'static [&'static str] {
    match kind {
        IndicatorKind::BloodPressure => &["mmHg", "kPa"],
        IndicatorKind::HeartRate => &["次/分", "bpm"],
        IndicatorKind::Temperature => &["℃", "°C"],
        IndicatorKind::RespiratoryRate => &["次/分"],
        IndicatorKind::OxygenSaturation => &["%"],
        IndicatorKind::Glucose => &["mmol/L", "mg/dL"],
        IndicatorKind::Hemoglobin => &["g/L", "g/dL"],
        IndicatorKind::WhiteCellCount => &["×10^9/L", "×109/L", "x10^9/L", "10^9/L", "G/L"],
        IndicatorKind::PlateletCount => &["×10^9/L", "×109/L", "x10^9/L", "10^9/L", "G/L"],
    }
}

static REFERENCE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*-\s*(\d+(?:\.\d+)?)\s*$").expect("reference range pattern")
});

enum ParsedValue {
    Single(f64),
    /// systolic/diastolic
    Ratio(f64, f64),
}

/// Validate extracted indicators in order. Data-quality findings come back
/// as issues; an unparseable value token is skipped locally and never
/// aborts the batch.
pub fn validate_indicators(indicators: Vec<Indicator>) -> MedicalValidationResult {
    let total_indicators = indicators.len();
    let mut issues = Vec::new();
    for indicator in &indicators {
        check_indicator(indicator, &mut issues);
    }
    let confidence = if total_indicators == 0 {
        0.0
    } else {
        (1.0 - issues.len() as f64 / total_indicators as f64).max(0.0)
    };
    MedicalValidationResult {
        indicators,
        total_indicators,
        issues,
        confidence,
    }
}

fn check_indicator(indicator: &Indicator, issues: &mut Vec<ValidationIssue>) {
    let display = indicator.kind.canonical_name();

    if indicator.name.trim().is_empty() {
        issues.push(issue(
            indicator,
            "Presence",
            format!("Indicator {display} is missing its name"),
            None,
        ));
    }
    if indicator.raw_value.trim().is_empty() {
        issues.push(issue(
            indicator,
            "Presence",
            format!("Indicator {display} has no value"),
            None,
        ));
        return;
    }

    match parse_value(indicator) {
        Some(ParsedValue::Single(value)) => {
            check_range(indicator, value, issues);
        }
        Some(ParsedValue::Ratio(systolic, diastolic)) => {
            check_range(indicator, systolic, issues);
            check_range(indicator, diastolic, issues);
            if systolic < diastolic {
                issues.push(issue(
                    indicator,
                    "CrossField",
                    format!(
                        "{display} value '{}' has systolic below diastolic, which is \
                         arithmetically impossible",
                        indicator.raw_value
                    ),
                    Some("swap or re-measure the recorded pressures".to_string()),
                ));
            }
        }
        None => {
            let indicator_name = display;
            debug!(
                indicator = indicator_name,
                value = %indicator.raw_value,
                "indicator value not parseable; skipping numeric checks"
            );
        }
    }

    if let Some(unit) = indicator.unit.as_deref() {
        let accepted = accepted_units(indicator.kind);
        if !accepted.contains(&unit.trim()) {
            issues.push(issue(
                indicator,
                "Unit",
                format!(
                    "{display} unit '{unit}' not in accepted set ({})",
                    accepted.join(", ")
                ),
                Some(format!("record {display} in {}", accepted[0])),
            ));
        }
    }

    if let Some(range) = indicator.reference_range.as_deref() {
        check_reference_range(indicator, range, issues);
    }
}

fn check_range(indicator: &Indicator, value: f64, issues: &mut Vec<ValidationIssue>) {
    let (min, max) = plausible_range(indicator.kind);
    if value < min || value > max {
        issues.push(issue(
            indicator,
            "Range",
            format!(
                "{} value {value} outside plausible range [{min}, {max}]",
                indicator.kind.canonical_name()
            ),
            None,
        ));
    }
}

fn check_reference_range(indicator: &Indicator, range: &str, issues: &mut Vec<ValidationIssue>) {
    let display = indicator.kind.canonical_name();
    let Some(caps) = REFERENCE_RANGE_RE.captures(range) else {
        issues.push(issue(
            indicator,
            "ReferenceRange",
            format!("{display} reference range '{range}' is not of the form 'number-number'"),
            None,
        ));
        return;
    };
    let min = caps[1].parse::<f64>().ok();
    let max = caps[2].parse::<f64>().ok();
    if let (Some(min), Some(max)) = (min, max)
        && min >= max
    {
        issues.push(issue(
            indicator,
            "ReferenceRange",
            format!("{display} reference range '{range}' has min >= max"),
            None,
        ));
    }
}

/// Parse the raw value. A hyphenated range reduces to its arithmetic mean;
/// a slash is the blood-pressure ratio. Returns `None` when no number can
/// be recovered.
fn parse_value(indicator: &Indicator) -> Option<ParsedValue> {
    let raw = indicator.raw_value.trim();
    if indicator.kind.is_ratio()
        && let Some((left, right)) = raw.split_once('/')
    {
        let systolic = left.trim().parse::<f64>().ok()?;
        let diastolic = right.trim().parse::<f64>().ok()?;
        return Some(ParsedValue::Ratio(systolic, diastolic));
    }
    if let Some((left, right)) = raw.split_once('-') {
        let low = left.trim().parse::<f64>().ok()?;
        let high = right.trim().parse::<f64>().ok()?;
        return Some(ParsedValue::Single((low + high) / 2.0));
    }
    raw.parse::<f64>().ok().map(ParsedValue::Single)
}

fn issue(
    indicator: &Indicator,
    category: &str,
    message: String,
    suggestion: Option<String>,
) -> ValidationIssue {
    ValidationIssue {
        indicator: Some(if indicator.name.trim().is_empty() {
            indicator.kind.canonical_name().to_string()
        } else {
            indicator.name.clone()
        }),
        rule_id: None,
        category: Some(category.to_string()),
        message,
        severity: Severity::Minor,
        suggestion,
    }
}

/// Summary projection of a validation result. Pure: derives counts and a
/// readable error-rate sentence, computes nothing new.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicalValidationReport {
    pub total_indicators: usize,
    pub distinct_indicator_names: usize,
    pub names_with_issues: usize,
    pub issue_count: usize,
    pub confidence: f64,
    pub summary: String,
}

pub fn generate_report(result: &MedicalValidationResult) -> MedicalValidationReport {
    let distinct: BTreeSet<&str> = result
        .indicators
        .iter()
        .map(|indicator| indicator.kind.canonical_name())
        .collect();
    let with_issues: BTreeSet<&str> = result
        .issues
        .iter()
        .filter_map(|issue| issue.indicator.as_deref())
        .collect();
    let error_rate = if result.total_indicators == 0 {
        0.0
    } else {
        result.issues.len() as f64 / result.total_indicators as f64 * 100.0
    };
    let summary = format!(
        "{} of {} indicator name(s) reported issues (error rate {:.1}%)",
        with_issues.len(),
        distinct.len(),
        error_rate
    );
    MedicalValidationReport {
        total_indicators: result.total_indicators,
        distinct_indicator_names: distinct.len(),
        names_with_issues: with_issues.len(),
        issue_count: result.issues.len(),
        confidence: result.confidence,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indicator(kind: IndicatorKind, value: &str) -> Indicator {
        Indicator {
            kind,
            name: kind.canonical_name().to_string(),
            raw_value: value.to_string(),
            unit: None,
            reference_range: None,
            span_start: 0,
            span_end: 0,
        }
    }

    #[test]
    fn temperature_in_range_is_clean() {
        let result = validate_indicators(vec![indicator(IndicatorKind::Temperature, "42")]);
        assert!(result.issues.is_empty());
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn temperature_out_of_range_cites_bounds() {
        let result = validate_indicators(vec![indicator(IndicatorKind::Temperature, "50")]);
        assert_eq!(result.issues.len(), 1);
        assert!(result.issues[0].message.contains("[30, 45]"));
        assert_eq!(result.issues[0].severity, Severity::Minor);
    }

    #[test]
    fn hyphenated_value_checks_the_mean() {
        // mean 40 is inside [30, 45] even though 50 alone is not
        let result = validate_indicators(vec![indicator(IndicatorKind::Temperature, "30-50")]);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn blood_pressure_inverted_ratio_is_flagged() {
        let result = validate_indicators(vec![indicator(IndicatorKind::BloodPressure, "80/120")]);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].category.as_deref(), Some("CrossField"));
    }

    #[test]
    fn blood_pressure_normal_ratio_is_clean() {
        let result = validate_indicators(vec![indicator(IndicatorKind::BloodPressure, "120/80")]);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn unit_mismatch_is_flagged() {
        let mut bad = indicator(IndicatorKind::Temperature, "36.5");
        bad.unit = Some("mmHg".to_string());
        let result = validate_indicators(vec![bad]);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].category.as_deref(), Some("Unit"));
    }

    #[test]
    fn malformed_reference_range_is_flagged() {
        let mut bad = indicator(IndicatorKind::Glucose, "5.2");
        bad.reference_range = Some("3.9~6.1".to_string());
        let result = validate_indicators(vec![bad]);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(
            result.issues[0].category.as_deref(),
            Some("ReferenceRange")
        );
    }

    #[test]
    fn inverted_reference_range_is_flagged() {
        let mut bad = indicator(IndicatorKind::Glucose, "5.2");
        bad.reference_range = Some("6.1-3.9".to_string());
        let result = validate_indicators(vec![bad]);
        assert_eq!(result.issues.len(), 1);
        assert!(result.issues[0].message.contains("min >= max"));
    }

    #[test]
    fn missing_value_is_presence_issue() {
        let result = validate_indicators(vec![indicator(IndicatorKind::HeartRate, " ")]);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].category.as_deref(), Some("Presence"));
    }

    #[test]
    fn confidence_zero_without_indicators() {
        let result = validate_indicators(vec![]);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.total_indicators, 0);
    }

    #[test]
    fn confidence_one_without_errors() {
        let result = validate_indicators(vec![
            indicator(IndicatorKind::Temperature, "36.5"),
            indicator(IndicatorKind::HeartRate, "72"),
        ]);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn report_projects_counts_and_sentence() {
        let result = validate_indicators(vec![
            indicator(IndicatorKind::Temperature, "50"),
            indicator(IndicatorKind::HeartRate, "72"),
        ]);
        let report = generate_report(&result);
        assert_eq!(report.total_indicators, 2);
        assert_eq!(report.distinct_indicator_names, 2);
        assert_eq!(report.names_with_issues, 1);
        assert!(report.summary.contains("error rate 50.0%"));
    }
}
