//! Notebook document model
//!
//! Only what the rewrite needs is typed: cell kind, source lines and tags.
//! Every other JSON field is carried through untouched.

use crate::error::NotebookError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of a cell as far as rewriting is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Code,
    Other,
}

/// How `source` was stored on disk, so it can be written back the same way
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceLayout {
    Lines,
    Joined,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSource {
    Lines(Vec<String>),
    Joined(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawCell {
    cell_type: String,
    #[serde(default)]
    metadata: Map<String, Value>,
    source: RawSource,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// A single notebook cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCell", into = "RawCell")]
pub struct Cell {
    cell_type: String,
    /// Source lines, each keeping its trailing newline
    pub lines: Vec<String>,
    layout: SourceLayout,
    pub metadata: Map<String, Value>,
    extra: Map<String, Value>,
}

impl From<RawCell> for Cell {
    fn from(raw: RawCell) -> Self {
        let (lines, layout) = match raw.source {
            RawSource::Lines(lines) => (lines, SourceLayout::Lines),
            RawSource::Joined(text) => (split_source(&text), SourceLayout::Joined),
        };
        Self {
            cell_type: raw.cell_type,
            lines,
            layout,
            metadata: raw.metadata,
            extra: raw.extra,
        }
    }
}

impl From<Cell> for RawCell {
    fn from(cell: Cell) -> Self {
        let source = match cell.layout {
            SourceLayout::Lines => RawSource::Lines(cell.lines),
            SourceLayout::Joined => RawSource::Joined(cell.lines.concat()),
        };
        Self {
            cell_type: cell.cell_type,
            metadata: cell.metadata,
            source,
            extra: cell.extra,
        }
    }
}

impl Cell {
    /// A fresh, unexecuted code cell
    pub fn code(source: &str) -> Self {
        let mut extra = Map::new();
        extra.insert("execution_count".to_string(), Value::Null);
        extra.insert("outputs".to_string(), Value::Array(Vec::new()));
        Self {
            cell_type: "code".to_string(),
            lines: split_source(source),
            layout: SourceLayout::Lines,
            metadata: Map::new(),
            extra,
        }
    }

    /// A markdown cell, mostly useful for building documents in tests
    pub fn markdown(source: &str) -> Self {
        Self {
            cell_type: "markdown".to_string(),
            lines: split_source(source),
            layout: SourceLayout::Lines,
            metadata: Map::new(),
            extra: Map::new(),
        }
    }

    pub fn kind(&self) -> CellKind {
        if self.cell_type == "code" {
            CellKind::Code
        } else {
            CellKind::Other
        }
    }

    pub fn is_code(&self) -> bool {
        self.kind() == CellKind::Code
    }

    pub fn cell_type(&self) -> &str {
        &self.cell_type
    }

    pub fn source(&self) -> String {
        self.lines.concat()
    }

    pub fn id(&self) -> Option<&str> {
        self.extra.get("id").and_then(Value::as_str)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.extra.insert("id".to_string(), Value::String(id.into()));
        self
    }

    /// Tags from `metadata.tags`, ignoring anything that is not a string
    pub fn tags(&self) -> Vec<&str> {
        self.metadata
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().contains(&tag)
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        if self.has_tag(tag) {
            return self;
        }
        let tags = self
            .metadata
            .entry("tags")
            .or_insert_with(|| Value::Array(Vec::new()));
        match tags {
            Value::Array(items) => items.push(Value::String(tag.to_string())),
            other => *other = Value::Array(vec![Value::String(tag.to_string())]),
        }
        self
    }
}

/// Splits cell text into lines that keep their `\n`, the way nbformat stores them
pub fn split_source(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

/// An ordered sequence of cells plus the notebook-level fields around them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub cells: Vec<Cell>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Document {
    pub fn new(cells: Vec<Cell>) -> Self {
        let mut extra = Map::new();
        extra.insert("metadata".to_string(), Value::Object(Map::new()));
        extra.insert("nbformat".to_string(), Value::from(4));
        extra.insert("nbformat_minor".to_string(), Value::from(5));
        Self { cells, extra }
    }

    /// Parses nbformat v4 JSON. Fails without side effects on anything that
    /// does not have a cell list with typed, line-based sources.
    pub fn from_json(text: &str) -> Result<Self, NotebookError> {
        serde_json::from_str(text).map_err(|e| NotebookError::malformed(e.to_string()))
    }

    /// Serializes with one-space indentation and a trailing newline, as Jupyter does
    pub fn to_json(&self) -> Result<String, NotebookError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)
            .map_err(|e| NotebookError::malformed(e.to_string()))?;
        let mut text =
            String::from_utf8(buf).map_err(|e| NotebookError::malformed(e.to_string()))?;
        text.push('\n');
        Ok(text)
    }

    /// Cell ids are part of the format from nbformat 4.5 on
    pub fn supports_cell_ids(&self) -> bool {
        let major = self.extra.get("nbformat").and_then(Value::as_u64);
        let minor = self.extra.get("nbformat_minor").and_then(Value::as_u64);
        matches!((major, minor), (Some(4), Some(m)) if m >= 5) || matches!(major, Some(v) if v > 4)
    }

    pub fn insert_leading(&mut self, cell: Cell) {
        self.cells.insert(0, cell);
    }

    /// Removes and returns every code cell carrying `tag`, keeping the rest in
    /// order. Non-code cells stay in place whatever their tags.
    pub fn take_tagged_code(&mut self, tag: &str) -> Vec<Cell> {
        let (taken, kept): (Vec<Cell>, Vec<Cell>) = std::mem::take(&mut self.cells)
            .into_iter()
            .partition(|c| c.is_code() && c.has_tag(tag));
        self.cells = kept;
        taken
    }

    pub fn code_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.is_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTEBOOK: &str = r##"{
 "cells": [
  {
   "cell_type": "markdown",
   "metadata": {},
   "source": ["# Title\n", "text"]
  },
  {
   "cell_type": "code",
   "execution_count": 3,
   "id": "abc",
   "metadata": {"tags": ["keep"]},
   "outputs": [],
   "source": "bucket = \"my-data\"\nprint(bucket)"
  }
 ],
 "metadata": {"kernelspec": {"name": "python3"}},
 "nbformat": 4,
 "nbformat_minor": 5
}"##;

    #[test]
    fn test_parse_cells_and_kinds() {
        let doc = Document::from_json(NOTEBOOK).unwrap();
        assert_eq!(doc.cells.len(), 2);
        assert_eq!(doc.cells[0].kind(), CellKind::Other);
        assert!(doc.cells[1].is_code());
        assert_eq!(doc.cells[1].lines, vec!["bucket = \"my-data\"\n", "print(bucket)"]);
        assert_eq!(doc.cells[1].tags(), vec!["keep"]);
        assert_eq!(doc.cells[1].id(), Some("abc"));
    }

    #[test]
    fn test_round_trip_preserves_unknown_fields_and_layout() {
        let doc = Document::from_json(NOTEBOOK).unwrap();
        let value: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        let original: Value = serde_json::from_str(NOTEBOOK).unwrap();
        assert_eq!(value, original);
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(Document::from_json("not json").is_err());
        assert!(Document::from_json("{}").is_err());
        assert!(Document::from_json(r#"{"cells": {}}"#).is_err());
        assert!(Document::from_json(r#"{"cells": [{"source": []}]}"#).is_err());
        assert!(Document::from_json(r#"{"cells": [{"cell_type": "code", "source": 5}]}"#).is_err());
    }

    #[test]
    fn test_code_cell_constructor() {
        let cell = Cell::code("a = 1\nb = 2").with_tag("parameters").with_id("0011aabb");
        assert!(cell.is_code());
        assert_eq!(cell.lines, vec!["a = 1\n", "b = 2"]);
        assert!(cell.has_tag("parameters"));
        assert_eq!(cell.id(), Some("0011aabb"));

        let value = serde_json::to_value(&cell).unwrap();
        assert_eq!(value["execution_count"], Value::Null);
        assert_eq!(value["outputs"], Value::Array(vec![]));
        assert_eq!(value["metadata"]["tags"][0], "parameters");
    }

    #[test]
    fn test_with_tag_is_idempotent() {
        let cell = Cell::code("x").with_tag("t").with_tag("t");
        assert_eq!(cell.tags(), vec!["t"]);
    }

    #[test]
    fn test_take_tagged_code() {
        let mut doc = Document::new(vec![
            Cell::code("a").with_tag("parameters"),
            Cell::markdown("b"),
            Cell::code("c"),
        ]);
        let taken = doc.take_tagged_code("parameters");
        assert_eq!(taken.len(), 1);
        assert_eq!(doc.cells.len(), 2);
        assert_eq!(doc.cells[0].source(), "b");
    }

    #[test]
    fn test_take_tagged_code_leaves_markdown() {
        let mut doc = Document::new(vec![
            Cell::markdown("## Parameters").with_tag("parameters"),
            Cell::code("x = 1"),
        ]);
        assert!(doc.take_tagged_code("parameters").is_empty());
        assert_eq!(doc.cells.len(), 2);
        assert!(doc.cells[0].has_tag("parameters"));
    }

    #[test]
    fn test_supports_cell_ids() {
        let mut doc = Document::from_json(NOTEBOOK).unwrap();
        assert!(doc.supports_cell_ids());
        doc.extra.insert("nbformat_minor".to_string(), Value::from(4));
        assert!(!doc.supports_cell_ids());
    }
}
