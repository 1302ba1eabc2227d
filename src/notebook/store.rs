//! Loading and saving `.ipynb` files through a [`FileSystem`]

use super::Document;
use crate::error::NotebookError;
use crate::fs::FileSystem;
use std::path::Path;
use tracing::debug;

pub struct NotebookStore<F: FileSystem> {
    fs: F,
}

impl<F: FileSystem> NotebookStore<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn load(&self, path: &Path) -> Result<Document, NotebookError> {
        if !self.fs.is_file(path) {
            return Err(NotebookError::io(path, "not a file"));
        }
        let text = self
            .fs
            .read_to_string(path)
            .map_err(|e| NotebookError::io(path, e))?;
        let doc = Document::from_json(&text)?;
        debug!(path = %path.display(), cells = doc.cells.len(), "loaded notebook");
        Ok(doc)
    }

    pub fn save(&self, path: &Path, doc: &Document) -> Result<(), NotebookError> {
        let text = doc.to_json()?;
        self.fs
            .write_atomic(path, &text)
            .map_err(|e| NotebookError::io(path, e))?;
        debug!(path = %path.display(), cells = doc.cells.len(), "saved notebook");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use crate::notebook::Cell;

    #[test]
    fn test_load_and_save() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "in.ipynb",
            r#"{"cells": [{"cell_type": "code", "metadata": {}, "source": ["x = 1"]}], "nbformat": 4, "nbformat_minor": 5}"#,
        );
        let store = NotebookStore::new(fs);

        let mut doc = store.load(Path::new("in.ipynb")).unwrap();
        doc.insert_leading(Cell::markdown("hi"));
        store.save(Path::new("out.ipynb"), &doc).unwrap();

        let reloaded = store.load(Path::new("out.ipynb")).unwrap();
        assert_eq!(reloaded.cells.len(), 2);
        assert_eq!(reloaded, doc);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let store = NotebookStore::new(MockFileSystem::new());
        let err = store.load(Path::new("nope.ipynb")).unwrap_err();
        assert!(matches!(err, NotebookError::Io { .. }));
    }

    #[test]
    fn test_malformed_file() {
        let fs = MockFileSystem::new();
        fs.add_file("bad.ipynb", "{\"cells\": 3}");
        let store = NotebookStore::new(fs);
        let err = store.load(Path::new("bad.ipynb")).unwrap_err();
        assert!(matches!(err, NotebookError::Malformed(_)));
    }

    #[test]
    fn test_failed_write_surfaces_io_error() {
        let store = NotebookStore::new(MockFileSystem::read_only());
        let doc = Document::new(vec![]);
        let err = store.save(Path::new("out.ipynb"), &doc).unwrap_err();
        assert!(matches!(err, NotebookError::Io { .. }));
    }
}
