use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Severity;

/// Fixed maximum score a document starts from before deductions.
pub const MAX_SCORE: f64 = 100.0;

/// Default qualification threshold supplied by the host configuration.
pub const DEFAULT_QUALIFICATION_THRESHOLD: f64 = 80.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error(
        "severity weights must satisfy critical > major > minor > 0 \
         (critical {critical}, major {major}, minor {minor})"
    )]
    NonMonotonicWeights {
        critical: f64,
        major: f64,
        minor: f64,
    },

    #[error("qualification threshold must be within 0..={MAX_SCORE}, got {0}")]
    ThresholdOutOfRange(f64),
}

/// Per-severity score deductions. Weights are configuration, but must be
/// strictly monotonic: critical > major > minor > 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityWeights {
    pub minor: f64,
    pub major: f64,
    pub critical: f64,
}

impl SeverityWeights {
    pub fn new(minor: f64, major: f64, critical: f64) -> Result<Self, ConfigError> {
        let weights = Self {
            minor,
            major,
            critical,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.minor > 0.0 && self.major > self.minor && self.critical > self.major) {
            return Err(ConfigError::NonMonotonicWeights {
                critical: self.critical,
                major: self.major,
                minor: self.minor,
            });
        }
        Ok(())
    }

    pub fn weight(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Minor => self.minor,
            Severity::Major => self.major,
            Severity::Critical => self.critical,
        }
    }
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            minor: 2.0,
            major: 5.0,
            critical: 10.0,
        }
    }
}

/// Scoring configuration for one validation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    pub weights: SeverityWeights,
    pub qualification_threshold: f64,
}

impl ScoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        if !(0.0..=MAX_SCORE).contains(&self.qualification_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(
                self.qualification_threshold,
            ));
        }
        Ok(())
    }
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            weights: SeverityWeights::default(),
            qualification_threshold: DEFAULT_QUALIFICATION_THRESHOLD,
        }
    }
}
