//! nbparam - turns literal values in notebook code cells into injectable parameters
//!
//! Each literal worth exposing (quoted assignment values, `%env` values, file
//! references, shell-escape storage URIs) is replaced by a `PARAM_*` name.
//! Every name is declared exactly once in a tagged header cell placed at the
//! top of the notebook, so runners such as papermill can override the values
//! at execution time.
//!
//! # Example Usage
//!
//! ```no_run
//! use nbparam::{NbParamConfig, Parameterizer, RealFileSystem, SnippetKind};
//! use std::path::Path;
//!
//! let config = NbParamConfig::default();
//! let parameterizer = Parameterizer::new(RealFileSystem::new(), config);
//! let report = parameterizer
//!     .parameterize(Path::new("train.ipynb"), None, SnippetKind::Papermill)
//!     .expect("parameterization failed");
//!
//! for p in &report.parameters {
//!     println!("{} = {}", p.name, p.value);
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`detectors`]: per-line candidate detection and literal replacement
//! - [`rewrite`]: the two-pass rewrite engine
//! - [`params`]: the parameter table and name derivation
//! - [`header`]: header cell rendering and re-reading
//! - [`notebook`]: the `.ipynb` document model and store
//! - [`pipeline`]: load, transform, save

pub mod cli;
pub mod config;
pub mod detectors;
pub mod error;
pub mod fs;
pub mod header;
pub mod notebook;
pub mod params;
pub mod pipeline;
pub mod rewrite;
pub mod snippets;
pub mod util;

pub use config::{ConfigError, NbParamConfig};
pub use detectors::{DetectorChain, LineDetector};
pub use error::{NotebookError, ParameterizeError};
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use notebook::{Cell, CellKind, Document, NotebookStore};
pub use params::{Parameter, ParameterTable};
pub use pipeline::{default_output_path, ParameterizeReport, Parameterizer};
pub use rewrite::{RewriteEngine, RewriteStats};
pub use snippets::SnippetKind;
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_nbparam() {
        assert_eq!(NAME, "nbparam");
    }
}
