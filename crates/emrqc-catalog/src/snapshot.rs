#![deny(unsafe_code)]

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use sha2::Digest;
use tracing::info;

use emrqc_model::TermSource;

use crate::error::CatalogError;
use crate::rules::{ContentRuleSource, RuleSet};
use crate::terms::{TermCatalog, TerminologySynonym, TypoMapping};

/// The full knowledge-base source as supplied by the host system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSource {
    #[serde(default)]
    pub terms: Vec<TermSource>,
    #[serde(default)]
    pub typo_mappings: Vec<TypoMapping>,
    #[serde(default)]
    pub synonyms: Vec<TerminologySynonym>,
    #[serde(default)]
    pub rules: Vec<ContentRuleSource>,
}

impl KnowledgeSource {
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One immutable, fingerprinted view of the knowledge base. Concurrent
/// validation runs share a snapshot read-only; reloads build a fresh
/// snapshot off to the side and publish it atomically.
#[derive(Debug)]
pub struct KnowledgeSnapshot {
    /// sha256 over the canonical JSON of the source data. Two snapshots
    /// built from identical sources carry identical fingerprints.
    pub fingerprint: String,
    pub terms: TermCatalog,
    pub rules: RuleSet,
}

impl KnowledgeSnapshot {
    pub fn build(source: &KnowledgeSource) -> Result<Arc<Self>, CatalogError> {
        let canonical = serde_json::to_vec(source)?;
        let fingerprint = hex::encode(sha2::Sha256::digest(&canonical));
        let terms = TermCatalog::load(&source.terms, &source.typo_mappings, &source.synonyms)?;
        let rules = RuleSet::load(&source.rules)?;
        info!(%fingerprint, "knowledge snapshot built");
        Ok(Arc::new(Self {
            fingerprint,
            terms,
            rules,
        }))
    }
}

/// Copy-and-swap holder for the active snapshot. `current` hands out a
/// cheap `Arc` clone; in-flight runs keep whatever snapshot they started
/// with. A failed build never reaches `publish`, so the prior snapshot
/// stays active.
#[derive(Debug)]
pub struct KnowledgeStore {
    active: RwLock<Arc<KnowledgeSnapshot>>,
}

impl KnowledgeStore {
    pub fn new(initial: Arc<KnowledgeSnapshot>) -> Self {
        Self {
            active: RwLock::new(initial),
        }
    }

    pub fn current(&self) -> Arc<KnowledgeSnapshot> {
        self.active
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn publish(&self, snapshot: Arc<KnowledgeSnapshot>) {
        let mut guard = self
            .active
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        info!(
            old = %guard.fingerprint,
            new = %snapshot.fingerprint,
            "knowledge snapshot published"
        );
        *guard = snapshot;
    }

    /// Build a snapshot from source and publish it in one step. On a load
    /// failure the prior snapshot remains active.
    pub fn reload(&self, source: &KnowledgeSource) -> Result<Arc<KnowledgeSnapshot>, CatalogError> {
        let snapshot = KnowledgeSnapshot::build(source)?;
        self.publish(snapshot.clone());
        Ok(snapshot)
    }
}
