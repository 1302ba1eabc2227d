//! Derivation of `PARAM_*` base names from detector hints

use regex::Regex;
use std::sync::OnceLock;

/// Prefix shared by every minted parameter name
pub const PARAM_PREFIX: &str = "PARAM_";

/// Strips surrounding whitespace and quotes from a hint and uppercases it
pub fn clean_hint(hint: &str) -> String {
    hint.trim()
        .trim_matches('"')
        .trim_matches('\'')
        .to_uppercase()
}

/// Builds the unsuffixed parameter name for a hint.
///
/// The last standalone alphanumeric token of the cleaned hint wins, so
/// `config["bucket"]` becomes `PARAM_BUCKET`. Identifiers joined by
/// underscores are a single word and are kept whole (`my_path` becomes
/// `PARAM_MY_PATH`). Returns `None` when nothing usable is left.
pub fn base_name(hint: &str) -> Option<String> {
    static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
    let token_re =
        TOKEN_REGEX.get_or_init(|| Regex::new(r"\b[a-zA-Z0-9]+\b").expect("valid regex"));

    let cleaned = clean_hint(hint);
    let token = token_re
        .find_iter(&cleaned)
        .last()
        .map(|m| m.as_str().to_string())
        .unwrap_or(cleaned);

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(format!("{}{}", PARAM_PREFIX, token))
    }
}
