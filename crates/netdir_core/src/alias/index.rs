//! Alias reverse lookup and collision report.
//!
//! Built on demand from a name set; holds no process-wide state.

use crate::alias::engine::AliasEngine;
use std::collections::BTreeMap;

/// `alias -> real names` index for privileged callers.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    names_by_alias: BTreeMap<String, Vec<String>>,
}

impl AliasIndex {
    /// Indexes every distinct name in `names`.
    pub fn build<'n>(engine: &AliasEngine, names: impl IntoIterator<Item = &'n str>) -> Self {
        let mut names_by_alias: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for name in names {
            let bucket = names_by_alias.entry(engine.alias(name)).or_default();
            if !bucket.iter().any(|existing| existing == name) {
                bucket.push(name.to_string());
            }
        }
        Self { names_by_alias }
    }

    /// Real names mapped to `alias`; more than one means a collision.
    pub fn real_names_for(&self, alias: &str) -> &[String] {
        self.names_by_alias
            .get(alias)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Aliases shared by two or more real names, sorted by alias.
    pub fn collisions(&self) -> Vec<(&str, &[String])> {
        self.names_by_alias
            .iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|(alias, names)| (alias.as_str(), names.as_slice()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names_by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names_by_alias.is_empty()
    }
}
