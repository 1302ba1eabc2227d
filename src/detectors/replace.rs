//! First-occurrence literal replacement with quote-form preference

use tracing::warn;

/// Which textual form of a literal was found and replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteForm {
    Double,
    Single,
    Raw,
    /// Not present in any form; the line was left unchanged
    Missing,
}

impl QuoteForm {
    pub fn is_missing(self) -> bool {
        self == QuoteForm::Missing
    }
}

/// Replaces the first occurrence of `literal` in `line` with `replacement`.
///
/// `"literal"` is preferred, then `'literal'`, then the bare text. The bare
/// fallback can hit an unrelated substring that happens to contain the same
/// characters.
pub fn replace_literal(line: &mut String, literal: &str, replacement: &str) -> QuoteForm {
    if literal.is_empty() {
        return QuoteForm::Missing;
    }

    let double = format!("\"{}\"", literal);
    let single = format!("'{}'", literal);

    let (needle, form) = if line.contains(&double) {
        (double, QuoteForm::Double)
    } else if line.contains(&single) {
        (single, QuoteForm::Single)
    } else if line.contains(literal) {
        (literal.to_string(), QuoteForm::Raw)
    } else {
        warn!(
            literal = %literal,
            replacement = %replacement,
            "literal not found in any quoted form, leaving line unchanged"
        );
        return QuoteForm::Missing;
    };

    if let Some(pos) = line.find(&needle) {
        line.replace_range(pos..pos + needle.len(), replacement);
    }
    form
}
