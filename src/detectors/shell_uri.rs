//! Object-storage URIs inside shell-escape lines (`!aws s3 cp ...`)
//!
//! The surrounding line is a command template, so the URI becomes a
//! `{PARAM_NAME}` interpolation placeholder instead of a bare name.

use super::{replace_literal, DetectorStats, LineDetector};
use crate::params::ParameterTable;
use regex::Regex;
use tracing::trace;

/// Marker that turns a code line into a shell command
pub const SHELL_MARKER: char = '!';

/// Hint used for every URI captured from a shell line
pub const SHELL_URI_HINT: &str = "S3_URI";

pub struct ShellUriDetector {
    pattern: Regex,
}

impl ShellUriDetector {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"s3://\S+").expect("valid regex"),
        }
    }

    pub fn is_shell_line(line: &str) -> bool {
        line.trim_start().starts_with(SHELL_MARKER)
    }
}

impl Default for ShellUriDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDetector for ShellUriDetector {
    fn name(&self) -> &'static str {
        "shell_uri"
    }

    fn rewrite(&self, line: &mut String, table: &mut ParameterTable) -> DetectorStats {
        let mut stats = DetectorStats::default();
        if !Self::is_shell_line(line) {
            return stats;
        }

        let Some(uri) = self.pattern.find(line).map(|m| m.as_str().to_string()) else {
            return stats;
        };
        let Some(name) = table.resolve_or_create(SHELL_URI_HINT, &uri) else {
            return stats;
        };

        trace!(value = %uri, name = %name, "shell uri");
        stats.record(replace_literal(line, &uri, &format!("{{{}}}", name)));
        stats
    }
}
