#![deny(unsafe_code)]

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use emrqc_catalog::KnowledgeSnapshot;
use emrqc_extract::{IndicatorExtractor, SymptomMatcher};
use emrqc_model::{ConfigError, Document, QcVerdict, ScoreConfig};

use crate::engine::ContentRuleEvaluator;
use crate::medical::{MedicalValidationResult, validate_indicators};
use crate::score::aggregate;

/// Everything one pipeline execution produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QcOutcome {
    pub verdict: QcVerdict,
    pub medical: MedicalValidationResult,
}

/// One document-validation pipeline bound to a knowledge snapshot.
///
/// Stateless per invocation: the snapshot and config are borrowed
/// read-only, so concurrent `run` calls against the same pipeline are
/// safe, and a reload published elsewhere never affects runs already in
/// flight.
pub struct QcPipeline<'a> {
    snapshot: &'a KnowledgeSnapshot,
    config: ScoreConfig,
}

impl<'a> QcPipeline<'a> {
    pub fn new(snapshot: &'a KnowledgeSnapshot, config: ScoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { snapshot, config })
    }

    /// Validate one document end to end. Deterministic: identical
    /// document + snapshot + config always yield an identical outcome.
    pub fn run(&self, document: &Document) -> QcOutcome {
        debug!(
            document_type = %document.document_type,
            sections = document.sections.len(),
            snapshot = %self.snapshot.fingerprint,
            "running qc pipeline"
        );

        let matcher = SymptomMatcher::new(&self.snapshot.terms);
        let extractor = IndicatorExtractor::new();

        let mut section_matches = BTreeMap::new();
        let mut indicators = Vec::new();
        for (section, text) in &document.sections {
            let hits = matcher.match_symptoms(text);
            if !hits.is_empty() {
                section_matches.insert(section.clone(), hits);
            }
            indicators.extend(extractor.extract(text));
        }

        let medical = validate_indicators(indicators);
        let rule_issues =
            ContentRuleEvaluator::new(&self.snapshot.rules).evaluate(document, &section_matches);

        let mut issues = medical.issues.clone();
        issues.extend(rule_issues);
        let verdict = aggregate(issues, &self.config);

        debug!(
            total_score = verdict.total_score,
            is_qualified = verdict.is_qualified,
            issues = verdict.issues.len(),
            "qc pipeline finished"
        );
        QcOutcome { verdict, medical }
    }
}
