//! FileSystem trait definition

use anyhow::Result;
use std::path::Path;

/// Abstraction over the file operations the notebook store needs
pub trait FileSystem: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a regular file
    fn is_file(&self, path: &Path) -> bool;

    /// Read file contents as string
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replace the file at `path` with `contents` in one step.
    ///
    /// Either the whole new content is visible afterwards or the previous
    /// state of `path` is left untouched.
    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()>;
}
