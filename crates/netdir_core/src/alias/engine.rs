//! Deterministic pseudonym generation.

use once_cell::sync::Lazy;
use std::collections::HashMap;

const POOL_SURNAMES: [&str; 10] = ["赵", "钱", "孙", "李", "周", "吴", "郑", "王", "冯", "陈"];
const POOL_GIVEN_NAMES: [&str; 15] = [
    "子墨", "若溪", "思远", "清扬", "云舒", "景行", "怀瑾", "明哲", "书言", "知秋", "听澜",
    "望舒", "慕白", "安歌", "星河",
];

// Index order is part of the external contract: reordering changes every
// alias ever shown.
static ALIAS_POOL: Lazy<Vec<String>> = Lazy::new(|| {
    POOL_SURNAMES
        .iter()
        .flat_map(|surname| {
            POOL_GIVEN_NAMES
                .iter()
                .map(move |given| format!("{surname}{given}"))
        })
        .collect()
});

/// Fixed placeholder pool, 150 entries.
pub fn alias_pool() -> &'static [String] {
    ALIAS_POOL.as_slice()
}

/// DJB2-style hash over UTF-16 code units with 32-bit wrapping arithmetic.
///
/// `hash = hash * 33 + unit`, seeded with 5381.
pub fn name_hash(name: &str) -> i32 {
    name.encode_utf16().fold(5381_i32, |hash, unit| {
        hash.wrapping_mul(33).wrapping_add(i32::from(unit))
    })
}

/// Pure `name -> alias` mapping with an exact-match override table.
#[derive(Debug, Clone, Default)]
pub struct AliasEngine {
    overrides: HashMap<String, String>,
}

impl AliasEngine {
    /// Creates an engine with an empty override table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine whose overrides take precedence over the pool.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            overrides: overrides
                .into_iter()
                .map(|(name, alias)| (name.into(), alias.into()))
                .collect(),
        }
    }

    /// Returns the pseudonym for `name`.
    ///
    /// Override hits are returned verbatim. Otherwise the pool entry at
    /// `|name_hash(name)| mod pool_len` is returned. Never fails; an empty
    /// name maps to a fixed pool entry.
    pub fn alias(&self, name: &str) -> String {
        if let Some(alias) = self.overrides.get(name) {
            return alias.clone();
        }
        let pool = alias_pool();
        let index = name_hash(name).unsigned_abs() as usize % pool.len();
        pool[index].clone()
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}
