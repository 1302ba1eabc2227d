//! Line detectors - independent pattern matchers that turn literals into parameters
//!
//! Each detector looks at a single code line, proposes `(hint, value)`
//! candidates, resolves them against the [`ParameterTable`] and rewrites the
//! line in place. The chain runs them in a fixed order, so later detectors
//! see what earlier ones substituted.

pub mod assignment;
pub mod env_directive;
pub mod file_reference;
pub mod filter;
pub mod replace;
pub mod shell_uri;

pub use assignment::AssignmentDetector;
pub use env_directive::EnvDirectiveDetector;
pub use file_reference::{FileReferenceDetector, DEFAULT_FILE_EXTENSIONS};
pub use replace::{replace_literal, QuoteForm};
pub use shell_uri::ShellUriDetector;

use crate::params::ParameterTable;
use std::ops::AddAssign;
use tracing::debug;

/// Per-line bookkeeping returned by detectors
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DetectorStats {
    /// Candidates that resolved to a parameter name
    pub captured: usize,
    /// Resolved candidates whose literal could not be located for replacement
    pub missed: usize,
}

impl DetectorStats {
    pub(crate) fn record(&mut self, form: QuoteForm) {
        self.captured += 1;
        if form.is_missing() {
            self.missed += 1;
        }
    }
}

impl AddAssign for DetectorStats {
    fn add_assign(&mut self, other: Self) {
        self.captured += other.captured;
        self.missed += other.missed;
    }
}

/// A single pattern matcher over one line of code
pub trait LineDetector: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Rewrites `line` in place, recording captured literals in `table`
    fn rewrite(&self, line: &mut String, table: &mut ParameterTable) -> DetectorStats;
}

/// The fixed, ordered chain of detectors applied in pass 1
pub struct DetectorChain {
    detectors: Vec<Box<dyn LineDetector>>,
}

impl DetectorChain {
    /// Builds the standard chain with the given file-extension whitelist
    pub fn new<S: AsRef<str>>(file_extensions: &[S]) -> Self {
        Self {
            detectors: vec![
                Box::new(AssignmentDetector::new()),
                Box::new(EnvDirectiveDetector::new()),
                Box::new(FileReferenceDetector::new(file_extensions)),
                Box::new(ShellUriDetector::new()),
            ],
        }
    }

    /// Names of the detectors in execution order
    pub fn names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Runs the filter and then every detector over one line
    pub fn rewrite_line(&self, line: &str, table: &mut ParameterTable) -> (String, DetectorStats) {
        let mut stats = DetectorStats::default();
        let mut current = line.to_string();

        if filter::should_skip(line) {
            return (current, stats);
        }

        for detector in &self.detectors {
            let found = detector.rewrite(&mut current, table);
            if found.captured > 0 {
                debug!(
                    detector = detector.name(),
                    captured = found.captured,
                    missed = found.missed,
                    "detector matched"
                );
            }
            stats += found;
        }

        (current, stats)
    }
}

impl Default for DetectorChain {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_EXTENSIONS)
    }
}
