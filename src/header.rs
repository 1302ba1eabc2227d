//! Header synthesis - the tagged leading cell that declares every parameter
//!
//! Downstream runners such as papermill find this cell by its tag and
//! override the declarations at execution time.

use crate::notebook::Cell;
use crate::params::{ParameterTable, PARAM_PREFIX};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

/// Tag papermill looks for
pub const DEFAULT_HEADER_TAG: &str = "parameters";

const PARAMS_URI_NAME: &str = "params_uri";

/// `name = "value"`, or single quotes when the value holds a double quote.
///
/// Values containing both quote styles are not escaped.
pub fn render_declaration(name: &str, value: &str) -> String {
    if value.contains('"') {
        format!("{} = '{}'", name, value)
    } else {
        format!("{} = \"{}\"", name, value)
    }
}

/// One declaration per table entry in first-seen order, followed by
/// `extra_lines`, joined without a trailing newline
pub fn render_header(table: &ParameterTable, extra_lines: &[&str]) -> String {
    table
        .iter()
        .map(|p| render_declaration(&p.name, &p.value))
        .chain(extra_lines.iter().map(|l| l.to_string()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the tagged header cell
pub fn header_cell(table: &ParameterTable, tag: &str, extra_lines: &[&str], with_id: bool) -> Cell {
    let source = render_header(table, extra_lines);
    let cell = Cell::code(&source).with_tag(tag);
    if with_id {
        cell.with_id(stable_cell_id(tag, &source))
    } else {
        cell
    }
}

/// Reads `PARAM_* = "value"` declarations back out of a header cell.
///
/// Lines that are not parameter declarations are ignored.
pub fn parse_declarations(cell: &Cell) -> Vec<(String, String)> {
    cell.lines
        .iter()
        .filter_map(|line| {
            let cap = declaration_regex().captures(line.trim_end_matches(['\n', '\r']))?;
            let name = cap.get(1)?.as_str();
            if !name.starts_with(PARAM_PREFIX) {
                return None;
            }
            let value = cap.get(2).or_else(|| cap.get(3))?.as_str();
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

/// Lines of an existing header cell that this tool did not generate.
///
/// Blank lines, `PARAM_*` declarations and the `params_uri` declaration are
/// dropped; anything else was written by hand and is returned in order.
pub fn carried_lines(cell: &Cell) -> Vec<String> {
    cell.lines
        .iter()
        .map(|line| line.trim_end_matches(['\n', '\r']))
        .filter(|line| !line.trim().is_empty())
        .filter(|line| match declaration_regex().captures(line) {
            Some(cap) => {
                let name = cap.get(1).map_or("", |m| m.as_str());
                !(name.starts_with(PARAM_PREFIX) || name == PARAMS_URI_NAME)
            }
            None => true,
        })
        .map(str::to_string)
        .collect()
}

fn declaration_regex() -> &'static Regex {
    static DECLARATION_REGEX: OnceLock<Regex> = OnceLock::new();
    DECLARATION_REGEX.get_or_init(|| {
        Regex::new(r#"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(?:"(.*)"|'(.*)')\s*$"#)
            .expect("valid regex")
    })
}

/// Seeds `table` from an existing header cell, returning how many entries were kept
pub fn seed_from_header(cell: &Cell, table: &mut ParameterTable) -> usize {
    parse_declarations(cell)
        .into_iter()
        .filter(|(name, value)| table.seed(name, value))
        .count()
}

/// Deterministic cell id: first 8 hex chars of SHA-256 over `salt` and `source`
pub fn stable_cell_id(salt: &str, source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update([0u8]);
    hasher.update(source.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..8].to_string()
}
