//! Assignment and dict-entry detector: `name = "value"`, `key: 'value'`

use super::{replace_literal, DetectorStats, LineDetector};
use crate::params::ParameterTable;
use regex::Regex;
use tracing::trace;

pub struct AssignmentDetector {
    pattern: Regex,
}

impl AssignmentDetector {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r#"([^=,]+)\s*(?:=|:)\s*(?:"([^"]+)"|'([^']+)')"#)
                .expect("valid regex"),
        }
    }

    /// `(hint, value)` pairs in the order they appear on the line
    pub fn candidates<'a>(&self, line: &'a str) -> Vec<(&'a str, &'a str)> {
        self.pattern
            .captures_iter(line)
            .filter_map(|cap| {
                let hint = cap.get(1)?.as_str();
                let value = cap.get(2).or_else(|| cap.get(3))?.as_str();
                if hint.trim().is_empty() || value.trim().is_empty() {
                    return None;
                }
                Some((hint, value))
            })
            .collect()
    }
}

impl Default for AssignmentDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDetector for AssignmentDetector {
    fn name(&self) -> &'static str {
        "assignment"
    }

    fn rewrite(&self, line: &mut String, table: &mut ParameterTable) -> DetectorStats {
        let mut stats = DetectorStats::default();
        let original = line.clone();

        for (hint, value) in self.candidates(&original) {
            let Some(name) = table.resolve_or_create(hint, value) else {
                continue;
            };
            trace!(hint = %hint.trim(), value = %value, name = %name, "assignment candidate");
            stats.record(replace_literal(line, value, &name));
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(line: &str, table: &mut ParameterTable) -> String {
        let mut line = line.to_string();
        AssignmentDetector::new().rewrite(&mut line, table);
        line
    }

    #[test]
    fn test_simple_assignment() {
        let mut table = ParameterTable::new();
        assert_eq!(rewrite("bucket = \"my-data\"", &mut table), "bucket = PARAM_BUCKET");
        assert_eq!(table.value_of("PARAM_BUCKET"), Some("my-data"));
    }

    #[test]
    fn test_single_quoted_assignment() {
        let mut table = ParameterTable::new();
        assert_eq!(rewrite("region='us-east-1'\n", &mut table), "region=PARAM_REGION\n");
    }

    #[test]
    fn test_dict_entries() {
        let mut table = ParameterTable::new();
        let out = rewrite("cfg = {\"bucket\": \"b1\", \"prefix\": 'p/'}", &mut table);
        assert_eq!(out, "cfg = {\"bucket\": PARAM_BUCKET, \"prefix\": PARAM_PREFIX}");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_keyword_argument() {
        let mut table = ParameterTable::new();
        let out = rewrite("run(model, lr=\"0.01\", tag='v2')", &mut table);
        assert_eq!(out, "run(model, lr=PARAM_LR, tag=PARAM_TAG)");
    }

    #[test]
    fn test_comparison_is_not_assignment() {
        let mut table = ParameterTable::new();
        assert_eq!(rewrite("ok = x == \"done\"", &mut table), "ok = x == \"done\"");
        assert!(table.is_empty());
    }

    #[test]
    fn test_empty_literal_skipped() {
        let mut table = ParameterTable::new();
        assert_eq!(rewrite("name = \"\"", &mut table), "name = \"\"");
        assert!(table.is_empty());
    }

    #[test]
    fn test_repeated_value_on_line_replaced_once() {
        let mut table = ParameterTable::new();
        let out = rewrite("a = \"v\"; print(\"v\")", &mut table);
        assert_eq!(out, "a = PARAM_A; print(\"v\")");
    }

    #[test]
    fn test_known_value_reuses_name() {
        let mut table = ParameterTable::new();
        rewrite("a = \"x.csv\"", &mut table);
        assert_eq!(rewrite("b = \"x.csv\"", &mut table), "b = PARAM_A");
        assert_eq!(table.len(), 1);
    }
}
