use super::FileSystem;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }

    fn staging_path(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".nbparam-tmp");
        path.with_file_name(name)
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).context(format!("Failed to read file {:?}", path))
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()> {
        let staging = Self::staging_path(path);
        let result = fs::write(&staging, contents)
            .context(format!("Failed to write staging file {:?}", staging))
            .and_then(|_| {
                fs::rename(&staging, path)
                    .context(format!("Failed to move {:?} into place", path))
            });

        if result.is_err() {
            let _ = fs::remove_file(&staging);
        }
        result
    }
}
