//! Rewrite engine - drives the detector chain and the global sync pass
//!
//! A run moves through `Scanning` (pass 1, per-line detection) and
//! `GlobalSync` (pass 2, document-wide replacement against the finished
//! table) before reaching `Done`. Pass 2 only starts once pass 1 has seen
//! every code line, since it relies on the complete table.

use super::sync::sync_line;
use crate::detectors::DetectorChain;
use crate::notebook::{Cell, Document};
use crate::params::ParameterTable;
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Scanning,
    GlobalSync,
    Done,
}

/// Counters collected over one run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    /// Code cells visited (excluding cells carrying an excluded tag)
    pub code_cells: usize,
    /// Code lines seen by pass 1
    pub lines_scanned: usize,
    /// Lines changed by pass 1
    pub lines_rewritten: usize,
    /// Candidates that resolved to a parameter in pass 1
    pub candidates_captured: usize,
    /// Candidates whose literal could not be located for replacement
    pub missed_substitutions: usize,
    /// Lines changed by pass 2
    pub lines_synced: usize,
    /// Quoted occurrences replaced by pass 2
    pub sync_substitutions: usize,
}

pub struct RewriteEngine {
    chain: DetectorChain,
    excluded_tags: Vec<String>,
    state: EngineState,
}

impl RewriteEngine {
    pub fn new(chain: DetectorChain) -> Self {
        Self {
            chain,
            excluded_tags: Vec::new(),
            state: EngineState::Idle,
        }
    }

    /// Cells carrying any of these tags are neither scanned nor synced
    pub fn with_excluded_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Rewrites every eligible code cell of `document`, capturing literals into
    /// `table`. Non-code cells and their order are left as they are.
    pub fn run(&mut self, document: &mut Document, table: &mut ParameterTable) -> RewriteStats {
        let mut stats = RewriteStats::default();

        self.state = EngineState::Scanning;
        for cell in document.cells.iter_mut() {
            if !self.is_eligible(cell) {
                continue;
            }
            stats.code_cells += 1;
            self.scan_cell(cell, table, &mut stats);
        }

        self.state = EngineState::GlobalSync;
        for cell in document.cells.iter_mut() {
            if !self.is_eligible(cell) {
                continue;
            }
            Self::sync_cell(cell, table, &mut stats);
        }

        self.state = EngineState::Done;
        info!(
            parameters = table.len(),
            lines_rewritten = stats.lines_rewritten,
            lines_synced = stats.lines_synced,
            missed = stats.missed_substitutions,
            "rewrite finished"
        );
        stats
    }

    fn is_eligible(&self, cell: &Cell) -> bool {
        cell.is_code() && !self.excluded_tags.iter().any(|t| cell.has_tag(t))
    }

    fn scan_cell(&self, cell: &mut Cell, table: &mut ParameterTable, stats: &mut RewriteStats) {
        for line in cell.lines.iter_mut() {
            stats.lines_scanned += 1;
            let (rewritten, found) = self.chain.rewrite_line(line, table);
            stats.candidates_captured += found.captured;
            stats.missed_substitutions += found.missed;

            if found.missed > 0 {
                warn!(line = %line.trim_end(), missed = found.missed, "literal left in place");
            }
            if rewritten != *line {
                debug!(before = %line.trim_end(), after = %rewritten.trim_end(), "pass 1 rewrite");
                stats.lines_rewritten += 1;
                *line = rewritten;
            }
        }
    }

    fn sync_cell(cell: &mut Cell, table: &ParameterTable, stats: &mut RewriteStats) {
        for line in cell.lines.iter_mut() {
            let (synced, substitutions) = sync_line(line, table);
            if substitutions > 0 {
                debug!(before = %line.trim_end(), after = %synced.trim_end(), "pass 2 rewrite");
                stats.lines_synced += 1;
                stats.sync_substitutions += substitutions;
                *line = synced;
            }
        }
    }
}

impl Default for RewriteEngine {
    fn default() -> Self {
        Self::new(DetectorChain::default())
    }
}
