#![deny(unsafe_code)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use emrqc_model::{TermEntry, TermSource};

use crate::error::CatalogError;

/// A known misspelling and its correction, applied before alias lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypoMapping {
    pub from: String,
    pub to: String,
}

/// Extra surface forms for a term already in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminologySynonym {
    pub term: String,
    pub synonyms: Vec<String>,
}

/// Counters reported by a successful catalog load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadDiagnostics {
    pub terms: usize,
    pub aliases: usize,
    pub typo_mappings: usize,
    /// Aliases that were already claimed by an earlier registration.
    /// First-registered wins; later claims are dropped.
    pub alias_collisions: usize,
    /// Synonym entries whose target term is not in the catalog.
    pub dangling_synonyms: usize,
}

/// In-memory index of symptom terms. Immutable after load; either the whole
/// load succeeds or no catalog is produced.
#[derive(Debug, Clone)]
pub struct TermCatalog {
    entries: Vec<TermEntry>,
    by_name: BTreeMap<String, usize>,
    by_alias: BTreeMap<String, usize>,
    /// Alias surface forms with their entry index, longest first (char
    /// count descending, then lexicographic) for shadow-free scanning.
    aliases_by_length: Vec<(String, usize)>,
    typo_corrections: BTreeMap<String, String>,
    diagnostics: LoadDiagnostics,
}

/// Case/whitespace normalization for catalog keys: ASCII case is folded,
/// non-ASCII is kept exact, all whitespace is stripped.
pub fn normalize_phrase(phrase: &str) -> String {
    phrase
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

impl TermCatalog {
    /// Build the catalog from its source data. Fails fast on the first
    /// malformed entry; no partial catalog is exposed.
    pub fn load(
        sources: &[TermSource],
        typos: &[TypoMapping],
        synonyms: &[TerminologySynonym],
    ) -> Result<Self, CatalogError> {
        let mut entries = Vec::with_capacity(sources.len());
        let mut by_name = BTreeMap::new();
        let mut by_alias: BTreeMap<String, usize> = BTreeMap::new();
        // Surface forms that won their registration, for the scanner.
        let mut alias_surfaces: Vec<(String, usize)> = Vec::new();
        let mut diagnostics = LoadDiagnostics::default();

        for (index, source) in sources.iter().enumerate() {
            if source.name.trim().is_empty() {
                return Err(CatalogError::malformed_term(index, "missing name"));
            }
            if source.category.trim().is_empty() {
                return Err(CatalogError::malformed_term(
                    index,
                    format!("term '{}' has no category", source.name.trim()),
                ));
            }

            let entry = TermEntry::from_source(source);
            let entry_idx = entries.len();
            let name_key = normalize_phrase(&entry.name);
            if by_name.contains_key(&name_key) {
                return Err(CatalogError::malformed_term(
                    index,
                    format!("duplicate term name '{}'", entry.name),
                ));
            }
            by_name.insert(name_key, entry_idx);

            for alias in &entry.aliases {
                if register_alias(&mut by_alias, &mut diagnostics, alias, entry_idx, &entry.name) {
                    alias_surfaces.push((alias.clone(), entry_idx));
                }
            }
            entries.push(entry);
        }

        // Terminology synonyms fold into the alias index of their target
        // term. A synonym for an unknown term is skipped, not fatal.
        let mut extra_aliases: Vec<(usize, String)> = Vec::new();
        for (index, synonym) in synonyms.iter().enumerate() {
            if synonym.term.trim().is_empty() {
                return Err(CatalogError::MalformedSynonym {
                    index,
                    message: "missing term".to_string(),
                });
            }
            let Some(&entry_idx) = by_name.get(&normalize_phrase(&synonym.term)) else {
                diagnostics.dangling_synonyms += 1;
                warn!(term = %synonym.term, "terminology synonym targets unknown term");
                continue;
            };
            for surface in &synonym.synonyms {
                let surface = surface.trim();
                if surface.is_empty() {
                    continue;
                }
                let term_name = entries[entry_idx].name.clone();
                if register_alias(&mut by_alias, &mut diagnostics, surface, entry_idx, &term_name)
                {
                    alias_surfaces.push((surface.to_string(), entry_idx));
                    extra_aliases.push((entry_idx, surface.to_string()));
                }
            }
        }
        for (entry_idx, surface) in extra_aliases {
            entries[entry_idx].aliases.insert(surface);
        }

        let mut typo_corrections = BTreeMap::new();
        for (index, typo) in typos.iter().enumerate() {
            if typo.from.trim().is_empty() || typo.to.trim().is_empty() {
                return Err(CatalogError::MalformedTypo {
                    index,
                    message: "missing from/to".to_string(),
                });
            }
            typo_corrections
                .entry(normalize_phrase(&typo.from))
                .or_insert_with(|| typo.to.trim().to_string());
        }
        diagnostics.typo_mappings = typo_corrections.len();

        let mut aliases_by_length = alias_surfaces;
        aliases_by_length.sort_by(|(left, _), (right, _)| {
            right
                .chars()
                .count()
                .cmp(&left.chars().count())
                .then_with(|| left.cmp(right))
        });

        diagnostics.terms = entries.len();
        diagnostics.aliases = by_alias.len();
        info!(
            terms = diagnostics.terms,
            aliases = diagnostics.aliases,
            typo_mappings = diagnostics.typo_mappings,
            alias_collisions = diagnostics.alias_collisions,
            "term catalog loaded"
        );

        Ok(Self {
            entries,
            by_name,
            by_alias,
            aliases_by_length,
            typo_corrections,
            diagnostics,
        })
    }

    /// Exact alias/name lookup after normalization and typo correction.
    pub fn lookup(&self, phrase: &str) -> Option<&TermEntry> {
        let mut key = normalize_phrase(phrase);
        if let Some(corrected) = self.typo_corrections.get(&key) {
            key = normalize_phrase(corrected);
        }
        self.by_alias.get(&key).map(|&idx| &self.entries[idx])
    }

    /// Lookup by canonical name only.
    pub fn lookup_name(&self, name: &str) -> Option<&TermEntry> {
        self.by_name
            .get(&normalize_phrase(name))
            .map(|&idx| &self.entries[idx])
    }

    /// Alias surface forms longest-first, each with its term entry.
    pub fn aliases_longest_first(&self) -> impl Iterator<Item = (&str, &TermEntry)> {
        self.aliases_by_length
            .iter()
            .map(|(alias, idx)| (alias.as_str(), &self.entries[*idx]))
    }

    pub fn entries(&self) -> &[TermEntry] {
        &self.entries
    }

    pub fn diagnostics(&self) -> LoadDiagnostics {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Register one alias surface form. Returns true when the alias was newly
/// claimed; a collision keeps the first registration.
fn register_alias(
    by_alias: &mut BTreeMap<String, usize>,
    diagnostics: &mut LoadDiagnostics,
    alias: &str,
    entry_idx: usize,
    term_name: &str,
) -> bool {
    let key = normalize_phrase(alias);
    if key.is_empty() {
        return false;
    }
    match by_alias.entry(key) {
        std::collections::btree_map::Entry::Vacant(vacant) => {
            vacant.insert(entry_idx);
            true
        }
        std::collections::btree_map::Entry::Occupied(occupied) => {
            if *occupied.get() != entry_idx {
                diagnostics.alias_collisions += 1;
                warn!(
                    alias,
                    term = term_name,
                    "alias already registered; first registration wins"
                );
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(name: &str, aliases: &[&str], category: &str) -> TermSource {
        TermSource {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
            body_part: None,
            nature: None,
            category: category.to_string(),
            duration_required: false,
            associated_symptoms: vec![],
            related_diseases: vec![],
        }
    }

    #[test]
    fn lookup_by_name_and_alias() {
        let catalog = TermCatalog::load(
            &[term("咽部异物感", &["咽异感", "喉部异物感"], "症状")],
            &[],
            &[],
        )
        .expect("load");
        assert_eq!(catalog.lookup("咽部异物感").unwrap().name, "咽部异物感");
        assert_eq!(catalog.lookup("咽异感").unwrap().name, "咽部异物感");
        assert!(catalog.lookup("头痛").is_none());
    }

    #[test]
    fn lookup_folds_ascii_case_and_whitespace() {
        let catalog = TermCatalog::load(&[term("SpO2下降", &[], "症状")], &[], &[]).expect("load");
        assert!(catalog.lookup("spo2 下降").is_some());
    }

    #[test]
    fn missing_name_fails_load() {
        let err = TermCatalog::load(&[term("  ", &[], "症状")], &[], &[]).unwrap_err();
        assert!(err.to_string().contains("missing name"));
    }

    #[test]
    fn alias_collision_first_registered_wins() {
        let catalog = TermCatalog::load(
            &[
                term("鼻塞", &["鼻堵"], "症状"),
                term("鼻窦炎", &["鼻堵"], "症状"),
            ],
            &[],
            &[],
        )
        .expect("load");
        assert_eq!(catalog.lookup("鼻堵").unwrap().name, "鼻塞");
        assert_eq!(catalog.diagnostics().alias_collisions, 1);
    }

    #[test]
    fn typo_mapping_corrects_lookup() {
        let catalog = TermCatalog::load(
            &[term("头晕", &[], "症状")],
            &[TypoMapping {
                from: "头昏".to_string(),
                to: "头晕".to_string(),
            }],
            &[],
        )
        .expect("load");
        assert_eq!(catalog.lookup("头昏").unwrap().name, "头晕");
    }

    #[test]
    fn synonyms_fold_into_alias_index() {
        let catalog = TermCatalog::load(
            &[term("胸痛", &[], "症状")],
            &[],
            &[TerminologySynonym {
                term: "胸痛".to_string(),
                synonyms: vec!["胸口痛".to_string()],
            }],
        )
        .expect("load");
        assert_eq!(catalog.lookup("胸口痛").unwrap().name, "胸痛");
    }

    #[test]
    fn aliases_longest_first_ordering() {
        let catalog = TermCatalog::load(
            &[term("咽部异物感", &["异物感"], "症状"), term("鼻塞", &[], "症状")],
            &[],
            &[],
        )
        .expect("load");
        let aliases: Vec<&str> = catalog.aliases_longest_first().map(|(a, _)| a).collect();
        assert_eq!(aliases, vec!["咽部异物感", "异物感", "鼻塞"]);
    }
}
