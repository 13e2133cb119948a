use indexmap::IndexMap;

use crate::names::normalize_name;

#[derive(Debug, Clone, Default)]
pub struct AliasAccumulator {
    groups: IndexMap<String, Vec<(String, i64)>>,
}

impl AliasAccumulator {
    pub fn record(&mut self, raw_name: &str, lookup: &str, verse_count: i64) {
        self.groups
            .entry(normalize_name(raw_name))
            .or_default()
            .push((lookup.to_string(), verse_count));
    }

    /// Normalized name to lookup keys, most-mentioned first. Equal counts keep
    /// accumulation order.
    pub fn finish(self) -> IndexMap<String, Vec<String>> {
        self.groups
            .into_iter()
            .map(|(name, mut entries)| {
                entries.sort_by(|a, b| b.1.cmp(&a.1));
                (name, entries.into_iter().map(|(lookup, _)| lookup).collect())
            })
            .collect()
    }
}
