//! Quoted file references and object-storage URIs, wherever they appear

use super::{replace_literal, DetectorStats, LineDetector};
use crate::params::ParameterTable;
use regex::Regex;
use tracing::trace;

/// Extensions recognized when no whitelist is configured
pub const DEFAULT_FILE_EXTENSIONS: &[&str] = &["pkl", "pk", "csv", "joblib", "onnx", "ipynb"];

/// URI scheme treated as a file reference regardless of extension
pub const OBJECT_STORAGE_SCHEME: &str = "s3://";

pub struct FileReferenceDetector {
    pattern: Regex,
}

impl FileReferenceDetector {
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
        let alternatives = extensions
            .iter()
            .map(|e| regex::escape(e.as_ref().trim_start_matches('.')))
            .filter(|e| !e.is_empty())
            .collect::<Vec<_>>()
            .join("|");

        let body = if alternatives.is_empty() {
            r#"s3://[^"']+"#.to_string()
        } else {
            format!(r#"[^"']+\.(?:{})|s3://[^"']+"#, alternatives)
        };
        let pattern = format!(r#""({body})"|'({body})'"#, body = body);

        Self {
            pattern: Regex::new(&pattern).expect("valid regex"),
        }
    }

    /// Quoted references on the line, without their quotes
    pub fn references<'a>(&self, line: &'a str) -> Vec<&'a str> {
        self.pattern
            .captures_iter(line)
            .filter_map(|cap| cap.get(1).or_else(|| cap.get(2)).map(|m| m.as_str()))
            .collect()
    }
}

impl Default for FileReferenceDetector {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_EXTENSIONS)
    }
}

/// Uppercased extension of the last path segment, or the first two
/// characters of the reference when that segment has none. A trailing
/// separator leaves an empty last segment.
pub fn reference_hint(path: &str) -> String {
    let segment = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match segment.trim_start_matches('.').rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_uppercase(),
        _ => path.chars().take(2).collect::<String>().to_uppercase(),
    }
}

impl LineDetector for FileReferenceDetector {
    fn name(&self) -> &'static str {
        "file_reference"
    }

    fn rewrite(&self, line: &mut String, table: &mut ParameterTable) -> DetectorStats {
        let mut stats = DetectorStats::default();
        let original = line.clone();

        for reference in self.references(&original) {
            let hint = reference_hint(reference);
            let Some(name) = table.resolve_or_create(&hint, reference) else {
                continue;
            };
            trace!(hint = %hint, value = %reference, name = %name, "file reference");
            stats.record(replace_literal(line, reference, &name));
        }

        stats
    }
}
