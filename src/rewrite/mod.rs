//! Two-pass rewrite: local detection, then document-wide synchronization

pub mod engine;
pub mod sync;

pub use engine::{EngineState, RewriteEngine, RewriteStats};
pub use sync::sync_line;
