#![deny(unsafe_code)]

pub mod engine;
pub mod medical;
pub mod pipeline;
pub mod score;

pub use crate::engine::ContentRuleEvaluator;
pub use crate::medical::{
    MedicalValidationReport, MedicalValidationResult, accepted_units, generate_report,
    plausible_range, validate_indicators,
};
pub use crate::pipeline::{QcOutcome, QcPipeline};
pub use crate::score::aggregate;
