use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Source form of a symptom term as supplied by the knowledge base.
///
/// Field names follow the upstream JSON (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermSource {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub body_part: Option<String>,
    #[serde(default)]
    pub nature: Option<String>,
    pub category: String,
    #[serde(default)]
    pub duration_required: bool,
    #[serde(default)]
    pub associated_symptoms: Vec<String>,
    #[serde(default)]
    pub related_diseases: Vec<String>,
}

/// A symptom term after catalog load. Immutable for the snapshot lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermEntry {
    pub name: String,
    pub aliases: BTreeSet<String>,
    pub body_part: Option<String>,
    pub nature: Option<String>,
    pub category: String,
    pub duration_required: bool,
    pub associated_symptoms: Vec<String>,
    pub related_diseases: Vec<String>,
}

impl TermEntry {
    /// Build the catalog entry from its source form. The canonical name is
    /// always part of the alias set.
    pub fn from_source(source: &TermSource) -> Self {
        let mut aliases: BTreeSet<String> = source
            .aliases
            .iter()
            .map(|alias| alias.trim().to_string())
            .filter(|alias| !alias.is_empty())
            .collect();
        aliases.insert(source.name.trim().to_string());
        Self {
            name: source.name.trim().to_string(),
            aliases,
            body_part: source.body_part.clone(),
            nature: source.nature.clone(),
            category: source.category.trim().to_string(),
            duration_required: source.duration_required,
            associated_symptoms: source.associated_symptoms.clone(),
            related_diseases: source.related_diseases.clone(),
        }
    }
}

/// A single symptom hit produced by the matcher. Spans are byte offsets
/// into the scanned section text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomMatch {
    /// Canonical term name.
    pub term_name: String,
    /// Canonical category of the term.
    pub category: String,
    /// The alias text as it appeared in the document.
    pub matched_alias: String,
    pub span_start: usize,
    pub span_end: usize,
    /// A negation marker precedes the match. Negated matches do not count
    /// toward entity-presence rules.
    pub negated: bool,
}
