#![deny(unsafe_code)]

pub mod error;
pub mod rules;
pub mod snapshot;
pub mod terms;

pub use crate::error::CatalogError;
pub use crate::rules::{ContentRuleSource, RuleSet};
pub use crate::snapshot::{KnowledgeSnapshot, KnowledgeSource, KnowledgeStore};
pub use crate::terms::{LoadDiagnostics, TermCatalog, TerminologySynonym, TypoMapping};
