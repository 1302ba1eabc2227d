//! Pass 2: replace any remaining quoted occurrence of a captured value

use crate::detectors::filter::has_triple_quote;
use crate::params::ParameterTable;
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn quoted_regex() -> &'static Regex {
    static QUOTED_REGEX: OnceLock<Regex> = OnceLock::new();
    QUOTED_REGEX.get_or_init(|| Regex::new(r#""([^"]*)"|'([^']*)'"#).expect("valid regex"))
}

/// Rewrites every quoted substring of `line` whose content equals a table
/// value into that value's name. Returns the new line and the number of
/// substitutions.
///
/// Lines holding a triple-quote marker are returned unchanged, since quote
/// pairing would split the block string delimiters apart.
pub fn sync_line(line: &str, table: &ParameterTable) -> (String, usize) {
    if has_triple_quote(line) {
        return (line.to_string(), 0);
    }

    let mut current = line.to_string();
    let mut substitutions = 0;

    for param in table {
        if param.value.is_empty() || !current.contains(param.value.as_str()) {
            continue;
        }

        // Each substitution removes a pair of quotes, so this terminates.
        loop {
            let mut replaced = 0;
            let next = quoted_regex()
                .replace_all(&current, |caps: &Captures| {
                    let content = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
                    if content == param.value {
                        replaced += 1;
                        param.name.clone()
                    } else {
                        caps[0].to_string()
                    }
                })
                .into_owned();

            if replaced == 0 {
                break;
            }
            substitutions += replaced;
            current = next;
        }
    }

    (current, substitutions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str)]) -> ParameterTable {
        let mut table = ParameterTable::new();
        for (name, value) in entries {
            table.seed(name, value);
        }
        table
    }

    #[test]
    fn test_replaces_every_quoted_occurrence() {
        let table = table(&[("PARAM_A", "x.csv")]);
        let (line, n) = sync_line("f(\"x.csv\", 'x.csv', \"x.csv\")", &table);
        assert_eq!(line, "f(PARAM_A, PARAM_A, PARAM_A)");
        assert_eq!(n, 3);
    }

    #[test]
    fn test_ignores_partial_matches() {
        let table = table(&[("PARAM_A", "x")]);
        let (line, n) = sync_line("print(\"x y\", 'xx', x)", &table);
        assert_eq!(line, "print(\"x y\", 'xx', x)");
        assert_eq!(n, 0);
    }

    #[test]
    fn test_value_behind_other_quoted_text() {
        let table = table(&[("PARAM_B", "b")]);
        let (line, _) = sync_line("d = {'a': 1, 'b': 2}", &table);
        assert_eq!(line, "d = {'a': 1, PARAM_B: 2}");
    }

    #[test]
    fn test_multiple_entries() {
        let table = table(&[("PARAM_A", "a"), ("PARAM_B", "b")]);
        let (line, n) = sync_line("def f(x=\"a\", y='b'):\n", &table);
        assert_eq!(line, "def f(x=PARAM_A, y=PARAM_B):\n");
        assert_eq!(n, 2);
    }

    #[test]
    fn test_block_string_delimiters_untouched() {
        let table = table(&[("PARAM_A", "x")]);
        for line in ["doc = \"\"\"x\"\"\"\n", "doc = '''x'''", "f(\"x\", \"\"\")"] {
            let (synced, n) = sync_line(line, &table);
            assert_eq!(synced, line);
            assert_eq!(n, 0);
        }
    }

    #[test]
    fn test_untouched_without_values() {
        let table = ParameterTable::new();
        let (line, n) = sync_line("x = \"a\"", &table);
        assert_eq!(line, "x = \"a\"");
        assert_eq!(n, 0);
    }
}
