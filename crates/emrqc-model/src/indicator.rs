use serde::{Deserialize, Serialize};

/// The quantitative clinical indicators recognized by the extractor.
///
/// Adding a kind here forces the range/unit tables in the validator to be
/// extended, since those tables match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    BloodPressure,
    HeartRate,
    Temperature,
    RespiratoryRate,
    OxygenSaturation,
    Glucose,
    Hemoglobin,
    WhiteCellCount,
    PlateletCount,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 9] = [
        IndicatorKind::BloodPressure,
        IndicatorKind::HeartRate,
        IndicatorKind::Temperature,
        IndicatorKind::RespiratoryRate,
        IndicatorKind::OxygenSaturation,
        IndicatorKind::Glucose,
        IndicatorKind::Hemoglobin,
        IndicatorKind::WhiteCellCount,
        IndicatorKind::PlateletCount,
    ];

    /// Canonical display name, matching the documentation language of the
    /// records being checked.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            IndicatorKind::BloodPressure => "血压",
            IndicatorKind::HeartRate => "心率",
            IndicatorKind::Temperature => "体温",
            IndicatorKind::RespiratoryRate => "呼吸",
            IndicatorKind::OxygenSaturation => "血氧饱和度",
            IndicatorKind::Glucose => "血糖",
            IndicatorKind::Hemoglobin => "血红蛋白",
            IndicatorKind::WhiteCellCount => "白细胞",
            IndicatorKind::PlateletCount => "血小板",
        }
    }

    /// Blood pressure is the only indicator recorded as a
    /// `systolic/diastolic` ratio.
    pub fn is_ratio(&self) -> bool {
        matches!(self, IndicatorKind::BloodPressure)
    }
}

/// One extracted quantitative indicator. Created by the extractor, consumed
/// within a single validation pass, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub kind: IndicatorKind,
    /// Indicator name as it appeared in the text (an alias of the kind).
    pub name: String,
    /// Raw value text: `"120/80"`, `"36.5"`, or `"4.0-6.1"`.
    pub raw_value: String,
    pub unit: Option<String>,
    /// Declared reference range, `"lo-hi"`, when one followed the value.
    pub reference_range: Option<String>,
    pub span_start: usize,
    pub span_end: usize,
}
