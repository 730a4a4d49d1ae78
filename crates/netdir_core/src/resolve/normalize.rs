//! Company name normalization.

use once_cell::sync::Lazy;
use regex::Regex;

// Innermost ASCII or full-width parenthetical group. Mixed bracket pairs are
// accepted because hand-entered names mix them freely.
static PARENTHETICAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[(（][^()（）]*[)）]").expect("valid parenthetical regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Normalizes a Company name into its identity key.
///
/// Rules, in order:
/// - strip every parenthetical group, `(...)` or `（...）`, innermost first
/// - collapse whitespace runs to one ASCII space
/// - trim both ends
///
/// Case is preserved; callers comparing employer names fold case themselves.
/// Unbalanced brackets are left in place.
pub fn normalize_company_name(name: &str) -> String {
    let mut stripped = name.to_string();
    loop {
        let next = PARENTHETICAL_RE.replace_all(&stripped, "");
        if next == stripped.as_str() {
            break;
        }
        stripped = next.into_owned();
    }

    WHITESPACE_RE.replace_all(&stripped, " ").trim().to_string()
}
