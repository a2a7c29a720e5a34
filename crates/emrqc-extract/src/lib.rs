#![deny(unsafe_code)]

pub mod duration;
pub mod indicators;
pub mod symptoms;

pub use crate::duration::{contains_duration, find_duration};
pub use crate::indicators::IndicatorExtractor;
pub use crate::symptoms::{NEGATION_MARKERS, NEGATION_WINDOW_CHARS, SymptomMatcher};
