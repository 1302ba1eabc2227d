//! In-memory notebook document and its on-disk container

pub mod model;
pub mod store;

pub use model::{Cell, CellKind, Document};
pub use store::NotebookStore;
