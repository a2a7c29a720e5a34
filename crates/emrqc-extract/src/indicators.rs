#![deny(unsafe_code)]

use std::sync::LazyLock;

use regex::Regex;

use emrqc_model::{Indicator, IndicatorKind};

const NUM: &str = r"\d+(?:\.\d+)?";

/// Unit tokens the extractor recognizes after a value. Case matters:
/// `g/L` (grams) and `G/L` (giga counts) are different units.
const UNIT_TOKENS: &str =
    r"mmol/L|mmHg|mg/dL|g/dL|g/L|kPa|次/分|bpm|℃|°C|%|[×xX]10\^?9/L|10\^9/L|G/L";

/// Surface names recognized for each indicator kind, longest first.
fn kind_aliases(kind: IndicatorKind) -> &'static [&'static str] {
    match kind {
        IndicatorKind::BloodPressure => &["血压", "BP"],
        IndicatorKind::HeartRate => &["心率", "脉搏", "HR"],
        IndicatorKind::Temperature => &["体温"],
        IndicatorKind::RespiratoryRate => &["呼吸频率", "呼吸", "RR"],
        IndicatorKind::OxygenSaturation => &["血氧饱和度", "氧饱和度", "SpO2", "SPO2"],
        IndicatorKind::Glucose => &["空腹血糖", "随机血糖", "血糖", "GLU"],
        IndicatorKind::Hemoglobin => &["血红蛋白", "HGB", "Hb"],
        IndicatorKind::WhiteCellCount => &["白细胞计数", "白细胞", "WBC"],
        IndicatorKind::PlateletCount => &["血小板计数", "血小板", "PLT"],
    }
}

struct IndicatorPattern {
    kind: IndicatorKind,
    regex: Regex,
}

static PATTERNS: LazyLock<Vec<IndicatorPattern>> = LazyLock::new(build_patterns);

fn build_patterns() -> Vec<IndicatorPattern> {
    IndicatorKind::ALL
        .iter()
        .map(|&kind| {
            let names = kind_aliases(kind).join("|");
            // Blood pressure additionally allows the systolic/diastolic
            // ratio shape; every kind allows a plain value or a range.
            let value = if kind.is_ratio() {
                format!(r"{NUM}\s*/\s*{NUM}|{NUM}\s*[-~]\s*{NUM}|{NUM}")
            } else {
                format!(r"{NUM}\s*[-~]\s*{NUM}|{NUM}")
            };
            let pattern = format!(
                r"(?P<name>{names})\s*[:：为]?\s*(?P<value>{value})\s*(?P<unit>{UNIT_TOKENS})?(?:\s*[（(]\s*参考(?:值|范围)?\s*[:：]?\s*(?P<refrange>{NUM}\s*-\s*{NUM})\s*[)）])?"
            );
            IndicatorPattern {
                kind,
                regex: Regex::new(&pattern).expect("indicator pattern"),
            }
        })
        .collect()
}

/// Pulls quantitative indicators out of free text using the fixed pattern
/// table. Best-effort: numeric tokens that do not follow a known indicator
/// name are ignored.
#[derive(Debug, Default)]
pub struct IndicatorExtractor;

impl IndicatorExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract all indicators, ordered by position in the text.
    pub fn extract(&self, text: &str) -> Vec<Indicator> {
        let mut indicators = Vec::new();
        for pattern in PATTERNS.iter() {
            for caps in pattern.regex.captures_iter(text) {
                let Some(whole) = caps.get(0) else { continue };
                let Some(name) = caps.name("name") else {
                    continue;
                };
                let Some(value) = caps.name("value") else {
                    continue;
                };
                indicators.push(Indicator {
                    kind: pattern.kind,
                    name: name.as_str().to_string(),
                    raw_value: squeeze_value(value.as_str()),
                    unit: caps.name("unit").map(|m| m.as_str().to_string()),
                    reference_range: caps.name("refrange").map(|m| squeeze_value(m.as_str())),
                    span_start: whole.start(),
                    span_end: whole.end(),
                });
            }
        }
        indicators.sort_by_key(|indicator| (indicator.span_start, indicator.span_end));
        indicators
    }
}

/// Strip internal whitespace and canonicalize the range separator.
fn squeeze_value(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| if ch == '~' { '-' } else { ch })
        .collect()
}
