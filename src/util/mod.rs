//! Utility modules for nbparam

pub mod logging;

pub use logging::{init_logging, json_from_env, parse_level, LoggingConfig};
