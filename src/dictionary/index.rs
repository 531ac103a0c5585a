/*!
 * Headword index over the dictionary entries.
 *
 * Two tables map a headword to every sense sharing it, one keyed by the
 * traditional form and one by the simplified form. The index is built once and
 * never mutated afterwards, so it can be shared freely behind an `Arc`.
 */

use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;

use super::entry::{self, DictionaryEntry};
use crate::errors::DictionaryError;

/// Read-only lookup tables over dictionary entries
#[derive(Debug, Default)]
pub struct DictionaryIndex {
    /// Senses keyed by traditional headword, in insertion order
    traditional: HashMap<String, Vec<DictionaryEntry>>,

    /// Senses keyed by simplified headword, in insertion order
    simplified: HashMap<String, Vec<DictionaryEntry>>,

    /// Number of entries indexed
    entry_count: usize,

    /// Longest headword in characters
    longest_headword: usize,
}

impl DictionaryIndex {
    /// Build the index from a list of entries
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = DictionaryEntry>,
    {
        let mut index = Self::default();

        for entry in entries {
            index.entry_count += 1;
            for headword in [&entry.traditional, &entry.simplified] {
                index.longest_headword = index.longest_headword.max(headword.chars().count());
            }

            if !entry.simplified.is_empty() {
                index
                    .simplified
                    .entry(entry.simplified.clone())
                    .or_default()
                    .push(entry.clone());
            }
            if !entry.traditional.is_empty() {
                index
                    .traditional
                    .entry(entry.traditional.clone())
                    .or_default()
                    .push(entry);
            }
        }

        index
    }

    /// Load a dictionary file and build the index
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let index = Self::from_entries(entry::load_entries(path)?);
        info!(
            "Loaded Chinese dictionary: {} entries, {} traditional and {} simplified headwords",
            index.entry_count,
            index.traditional.len(),
            index.simplified.len()
        );
        debug!("Longest headword: {} characters", index.longest_headword);
        Ok(index)
    }

    /// All senses of a headword
    ///
    /// The traditional table is consulted first; the first table holding the
    /// word wins even if the other table also holds it.
    pub fn lookup(&self, word: &str) -> Option<&[DictionaryEntry]> {
        self.traditional
            .get(word)
            .or_else(|| self.simplified.get(word))
            .map(Vec::as_slice)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lookup(word).is_some()
    }

    pub fn len(&self) -> usize {
        self.entry_count
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    pub fn longest_headword(&self) -> usize {
        self.longest_headword
    }
}

/// Combine the glosses of all senses of one headword
///
/// Distinct glosses are ordered shortest first (ties keep entry order) and
/// joined with `"; "`.
pub fn resolve_gloss(entries: &[DictionaryEntry]) -> String {
    let mut glosses: Vec<&str> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !glosses.contains(&entry.english.as_str()) {
            glosses.push(&entry.english);
        }
    }
    glosses.sort_by_key(|gloss| gloss.chars().count());
    glosses.join("; ")
}
