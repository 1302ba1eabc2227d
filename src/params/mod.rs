//! Canonical parameter names and the value-deduplicating parameter table

pub mod naming;
pub mod table;

pub use naming::{base_name, clean_hint, PARAM_PREFIX};
pub use table::{Parameter, ParameterTable};
