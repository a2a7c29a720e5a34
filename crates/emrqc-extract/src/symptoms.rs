#![deny(unsafe_code)]

use emrqc_catalog::TermCatalog;
use emrqc_model::SymptomMatch;

/// Markers that negate an immediately following symptom mention.
pub const NEGATION_MARKERS: &[&str] = &["否认", "没有", "未见", "不伴", "无", "未"];

/// How many characters immediately preceding a match are scanned for a
/// negation marker.
pub const NEGATION_WINDOW_CHARS: usize = 6;

/// Scans section text against the term catalog.
///
/// Matching is a pure function of (text, catalog): the same input always
/// yields the same matches, in text order.
pub struct SymptomMatcher<'a> {
    catalog: &'a TermCatalog,
}

impl<'a> SymptomMatcher<'a> {
    pub fn new(catalog: &'a TermCatalog) -> Self {
        Self { catalog }
    }

    /// All symptom hits in `text`, ordered by position.
    ///
    /// Aliases are tried longest-first so a short alias never shadows a
    /// longer, more specific one; once a span is consumed, shorter aliases
    /// inside it do not fire again. ASCII is compared case-insensitively,
    /// non-ASCII exactly. Negated mentions are still returned, flagged.
    pub fn match_symptoms(&self, text: &str) -> Vec<SymptomMatch> {
        let folded = text.to_ascii_lowercase();
        let mut consumed: Vec<(usize, usize)> = Vec::new();
        let mut matches = Vec::new();

        for (alias, entry) in self.catalog.aliases_longest_first() {
            let needle = alias.to_ascii_lowercase();
            if needle.is_empty() {
                continue;
            }
            let mut from = 0;
            while from < folded.len() {
                let Some(rel) = folded[from..].find(&needle) else {
                    break;
                };
                let start = from + rel;
                let end = start + needle.len();
                if overlaps(&consumed, start, end) {
                    let step = folded[start..].chars().next().map_or(1, char::len_utf8);
                    from = start + step;
                    continue;
                }
                consumed.push((start, end));
                matches.push(SymptomMatch {
                    term_name: entry.name.clone(),
                    category: entry.category.clone(),
                    matched_alias: text[start..end].to_string(),
                    span_start: start,
                    span_end: end,
                    negated: is_negated(text, start),
                });
                from = end;
            }
        }

        matches.sort_by_key(|hit| (hit.span_start, hit.span_end));
        matches
    }
}

fn overlaps(consumed: &[(usize, usize)], start: usize, end: usize) -> bool {
    consumed
        .iter()
        .any(|&(used_start, used_end)| start < used_end && used_start < end)
}

/// A match is negated when a marker appears in the window of characters
/// immediately preceding it.
fn is_negated(text: &str, span_start: usize) -> bool {
    let mut window: Vec<char> = text[..span_start]
        .chars()
        .rev()
        .take(NEGATION_WINDOW_CHARS)
        .collect();
    window.reverse();
    let window: String = window.into_iter().collect();
    NEGATION_MARKERS.iter().any(|marker| window.contains(marker))
}
