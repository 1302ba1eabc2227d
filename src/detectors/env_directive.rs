//! `%env KEY=value` directive detector
//!
//! Values become shell-style references (`$PARAM_KEY`) because the directive
//! expands environment variables rather than evaluating code.

use super::{DetectorStats, LineDetector, QuoteForm};
use crate::params::ParameterTable;
use regex::Regex;
use tracing::trace;

/// Marker that introduces an environment directive
pub const ENV_MARKER: &str = "%env";

pub struct EnvDirectiveDetector {
    pattern: Regex,
}

impl EnvDirectiveDetector {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r#"%env\s+([^=,]+)\s*=\s*(?:"([^"]+)"|'([^']+)'|([^\s,]+))"#)
                .expect("valid regex"),
        }
    }
}

impl Default for EnvDirectiveDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDetector for EnvDirectiveDetector {
    fn name(&self) -> &'static str {
        "env_directive"
    }

    fn rewrite(&self, line: &mut String, table: &mut ParameterTable) -> DetectorStats {
        let mut stats = DetectorStats::default();
        let mut cursor = 0;

        // One directive per iteration, left to right; stops at the first
        // directive that does not yield both a key and a value.
        while line[cursor..].contains(ENV_MARKER) {
            let Some(cap) = self.pattern.captures_at(line, cursor) else {
                break;
            };
            let Some(key) = cap.get(1) else { break };
            let (value, quoted) = match (cap.get(2), cap.get(3), cap.get(4)) {
                (Some(v), _, _) | (_, Some(v), _) => (v, true),
                (_, _, Some(v)) => (v, false),
                _ => break,
            };

            let value_text = value.as_str();
            let span = if quoted {
                value.start() - 1..value.end() + 1
            } else {
                value.range()
            };

            // Already an expansion, possibly one written by an earlier detector
            if value_text.starts_with('$') {
                cursor = span.end;
                continue;
            }

            let name = if table.contains_name(value_text) {
                value_text.to_string()
            } else {
                match table.resolve_or_create(key.as_str(), value_text) {
                    Some(name) => name,
                    None => break,
                }
            };
            trace!(key = %key.as_str().trim(), value = %value_text, name = %name, "env directive");

            let reference = format!("${}", name);
            line.replace_range(span.clone(), &reference);
            stats.record(QuoteForm::Raw);
            cursor = span.start + reference.len();
        }

        stats
    }
}
