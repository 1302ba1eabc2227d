//! One-shot parameterization: load, rewrite, synthesize header and snippet, save
//!
//! Nothing is written unless every step succeeds. The output is produced in a
//! single atomic write through the [`FileSystem`].

use crate::config::NbParamConfig;
use crate::error::{ParameterizeError, Result};
use crate::fs::FileSystem;
use crate::header::{carried_lines, header_cell, seed_from_header, stable_cell_id};
use crate::notebook::{Cell, Document, NotebookStore};
use crate::params::ParameterTable;
use crate::rewrite::{RewriteEngine, RewriteStats};
use crate::snippets::{
    nbrun_snippet, papermill_snippet, params_uri_loader, SnippetKind, PARAMS_URI_DECLARATION,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const OUTPUT_SUFFIX: &str = "-parameterized";

/// What a run produced
#[derive(Debug, Clone, Serialize)]
pub struct ParameterizeReport {
    pub input: PathBuf,
    /// `None` for a dry run
    pub output: Option<PathBuf>,
    pub snippet: SnippetKind,
    /// Finalized table in first-seen order
    pub parameters: ParameterTable,
    /// Parameters read back from an existing header
    pub reused_parameters: usize,
    /// Parameters minted by this run
    pub new_parameters: usize,
    pub stats: RewriteStats,
}

/// Result of transforming a document in memory
#[derive(Debug)]
pub struct Transformed {
    pub table: ParameterTable,
    pub stats: RewriteStats,
}

pub struct Parameterizer<F: FileSystem> {
    store: NotebookStore<F>,
    config: NbParamConfig,
}

impl<F: FileSystem> Parameterizer<F> {
    pub fn new(fs: F, config: NbParamConfig) -> Self {
        Self {
            store: NotebookStore::new(fs),
            config,
        }
    }

    pub fn config(&self) -> &NbParamConfig {
        &self.config
    }

    pub fn store(&self) -> &NotebookStore<F> {
        &self.store
    }

    /// Parameterizes `input` and writes the result to `output`, or to
    /// [`default_output_path`] when no output is given.
    pub fn parameterize(
        &self,
        input: &Path,
        output: Option<&Path>,
        snippet: SnippetKind,
    ) -> Result<ParameterizeReport> {
        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_output_path(input));
        info!(input = %input.display(), output = %output.display(), snippet = %snippet, "parameterizing notebook");

        let mut document = self.store.load(input)?;
        let notebook_name = output.display().to_string();
        let transformed = self.transform(&mut document, snippet, &notebook_name)?;
        self.store.save(&output, &document)?;

        Ok(self.report(input, Some(output), snippet, transformed))
    }

    /// Runs both passes in memory and reports the table without writing
    pub fn scan(&self, input: &Path) -> Result<ParameterizeReport> {
        info!(input = %input.display(), "scanning notebook");
        let mut document = self.store.load(input)?;
        let notebook_name = input.display().to_string();
        let transformed = self.transform(&mut document, SnippetKind::None, &notebook_name)?;
        Ok(self.report(input, None, SnippetKind::None, transformed))
    }

    /// Rewrites `document` in place and prepends the generated cells.
    ///
    /// The resulting order is `[snippet?, header, params_uri loader?, original...]`.
    /// `notebook_name` is the path the snippet tells the runner to execute.
    pub fn transform(
        &self,
        document: &mut Document,
        snippet: SnippetKind,
        notebook_name: &str,
    ) -> Result<Transformed> {
        let nbrun = match snippet {
            SnippetKind::NbRun => Some(self.config.nbrun_settings()?),
            _ => None,
        };
        let header_tag = self.config.header_tag.as_str();
        let snippet_tag = self.config.snippet_tag.as_str();
        let with_ids = document.supports_cell_ids();

        let mut table = ParameterTable::new();
        let mut carried = Vec::new();
        for cell in document.take_tagged_code(header_tag) {
            let seeded = seed_from_header(&cell, &mut table);
            carried.extend(carried_lines(&cell));
            debug!(seeded, "reusing existing header");
        }
        let dropped = document.take_tagged_code(snippet_tag).len();
        if dropped > 0 {
            debug!(dropped, "dropped previously generated snippet cells");
        }

        let mut engine = RewriteEngine::new(self.config.detector_chain())
            .with_excluded_tags([header_tag, snippet_tag]);
        let stats = engine.run(document, &mut table);

        let mut extra_lines: Vec<&str> = carried.iter().map(String::as_str).collect();
        if nbrun.is_some() {
            extra_lines.push(PARAMS_URI_DECLARATION);
        }
        let header = header_cell(&table, header_tag, &extra_lines, with_ids);

        let snippet_source = match (&snippet, &nbrun) {
            (SnippetKind::Papermill, _) => {
                Some(papermill_snippet(notebook_name, &table, &self.config.kernel_name))
            }
            (SnippetKind::NbRun, Some(settings)) => {
                Some(nbrun_snippet(notebook_name, &table, settings))
            }
            _ => None,
        }
        .transpose()
        .map_err(|e| ParameterizeError::Snippet(e.to_string()))?;

        if let Some(settings) = &nbrun {
            let loader = params_uri_loader(&settings.utils_uri);
            document.insert_leading(generated_cell(&loader, snippet_tag, with_ids));
        }
        document.insert_leading(header);
        if let Some(source) = snippet_source {
            document.insert_leading(generated_cell(&source, snippet_tag, with_ids));
        }

        Ok(Transformed { table, stats })
    }

    fn report(
        &self,
        input: &Path,
        output: Option<PathBuf>,
        snippet: SnippetKind,
        transformed: Transformed,
    ) -> ParameterizeReport {
        let Transformed { table, stats } = transformed;
        ParameterizeReport {
            input: input.to_path_buf(),
            output,
            snippet,
            reused_parameters: table.seeded_len(),
            new_parameters: table.minted_len(),
            parameters: table,
            stats,
        }
    }
}

fn generated_cell(source: &str, tag: &str, with_id: bool) -> Cell {
    let cell = Cell::code(source).with_tag(tag);
    if with_id {
        cell.with_id(stable_cell_id(tag, source))
    } else {
        cell
    }
}

/// `<stem>-parameterized.ipynb` next to `input`
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "notebook".to_string());
    input.with_file_name(format!("{}{}.ipynb", stem, OUTPUT_SUFFIX))
}
