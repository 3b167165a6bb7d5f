//! Lookup maps for text-keyed master tables
//!
//! A whole table is read once and indexed in memory so that resolving a page
//! of addresses costs one hash lookup per row instead of one query per row.

use std::collections::HashMap;

use super::normalization::{canonical_key, normalize};

/// Text-keyed dictionary tolerant to case, whitespace and "zone" suffixes
#[derive(Debug, Clone)]
pub struct LookupMap<V> {
    entries: HashMap<String, V>,
    aliases: HashMap<String, V>,
}

impl<V: Clone> LookupMap<V> {
    /// Index `(key, value)` pairs. Each key is stored verbatim and normalized;
    /// later pairs overwrite earlier ones on the same key.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
    {
        let mut entries = HashMap::new();
        let mut aliases = HashMap::new();

        for (key, value) in pairs {
            let key = key.as_ref();
            entries.insert(key.to_string(), value.clone());
            entries.insert(normalize(Some(key)), value.clone());
            aliases.insert(canonical_key(key), value);
        }

        Self { entries, aliases }
    }

    /// Resolve by normalized key, falling back to the canonical alias
    pub fn get(&self, key: &str) -> Option<&V> {
        let normalized = normalize(Some(key));
        if normalized.is_empty() {
            return None;
        }
        self.entries
            .get(&normalized)
            .or_else(|| self.aliases.get(&canonical_key(key)))
    }

    /// Entry stored under the verbatim key
    pub fn get_exact(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Number of distinct keys (verbatim and normalized)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
