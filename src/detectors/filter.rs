//! Lines that describe structure rather than data are never rewritten

use regex::Regex;
use std::sync::OnceLock;

/// True if no detector may touch this line.
///
/// Blank lines, comments, definitions, loops, conditionals and imports are
/// skipped, as is any line holding a triple-quote marker since block string
/// literals are not tracked.
pub fn should_skip(line: &str) -> bool {
    static STRUCTURE_REGEX: OnceLock<Regex> = OnceLock::new();
    let structure_re = STRUCTURE_REGEX.get_or_init(|| {
        Regex::new(r"^(?:(?:def|class|async|for|while|if|elif|else|import|from)\b|#)")
            .expect("valid regex")
    });

    let trimmed = line.trim();
    trimmed.is_empty() || structure_re.is_match(trimmed) || has_triple_quote(line)
}

/// True if the line opens, closes or holds a block string literal
pub fn has_triple_quote(line: &str) -> bool {
    line.contains("\"\"\"") || line.contains("'''")
}
