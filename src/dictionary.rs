/*!
 * Custom dictionary support.
 *
 * A dictionary is an ordered list of `original=translation` mappings the
 * provider is instructed to apply verbatim. Dictionaries can be imported from
 * and exported to a plain text file with one mapping per line.
 */

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One term mapping applied during translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Term as it appears in the source text
    pub original: String,

    /// Translation that must be used for the term
    pub translation: String,
}

impl DictionaryEntry {
    pub fn new(original: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            translation: translation.into(),
        }
    }
}

/// Parse a dictionary import file against an already-loaded dictionary.
///
/// One `original=translation` mapping per line. Lines that are blank, have no
/// `=` or more than one `=`, or have an empty side are skipped. Mappings whose
/// original is already present in `existing`, or duplicated within the import
/// itself, are skipped as well - the first occurrence wins.
///
/// Returns only the new entries, in the order they appeared in the file.
pub fn parse_import(content: &str, existing: &[DictionaryEntry]) -> Vec<DictionaryEntry> {
    let known: HashSet<&str> = existing.iter().map(|e| e.original.as_str()).collect();
    let mut seen_in_import: HashSet<String> = HashSet::new();
    let mut entries = Vec::new();

    for line in content.lines() {
        let mut parts = line.split('=');
        let (Some(original), Some(translation), None) = (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };
        let original = original.trim();
        let translation = translation.trim();
        if original.is_empty() || translation.is_empty() {
            continue;
        }
        if known.contains(original) || seen_in_import.contains(original) {
            continue;
        }
        seen_in_import.insert(original.to_string());
        entries.push(DictionaryEntry::new(original, translation));
    }

    entries
}

/// Render a dictionary back into the one-mapping-per-line import format.
pub fn export(entries: &[DictionaryEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}={}", e.original, e.translation))
        .collect::<Vec<_>>()
        .join("\n")
}
