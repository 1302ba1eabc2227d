//! Configuration management for nbparam
//!
//! Settings are loaded from environment variables with sensible defaults.
//!
//! # Environment Variables
//!
//! - `NBPARAM_LOG_LEVEL`: Logging level - default: "info"
//! - `NBPARAM_HEADER_TAG`: Tag of the generated header cell - default: "parameters"
//! - `NBPARAM_SNIPPET_TAG`: Tag of generated snippet cells - default: "nbparam-snippet"
//! - `NBPARAM_FILE_EXTENSIONS`: Comma-separated file-reference whitelist -
//!   default: "pkl,pk,csv,joblib,onnx,ipynb"
//! - `NBPARAM_KERNEL_NAME`: Kernel used by the papermill snippet - default: "python3"
//! - `NBPARAM_NBRUN_SCRIPT_URI`: Location of the nbrun runner script - no default
//! - `NBPARAM_NBRUN_UTILS_URI`: Location of the nbrun `params_uri` helper - no default
//! - `NBPARAM_NBRUN_INSTANCE_TYPE`: nbrun instance type - default: "ml.p3.8xlarge"
//! - `NBPARAM_NBRUN_IMAGE`: nbrun image - default: "notebook-runner-tf"
//!
//! # Example
//!
//! ```no_run
//! use nbparam::NbParamConfig;
//!
//! let config = NbParamConfig::default();
//! config.validate().expect("Invalid configuration");
//! ```

use crate::detectors::{DetectorChain, DEFAULT_FILE_EXTENSIONS};
use crate::header::DEFAULT_HEADER_TAG;
use crate::snippets::NbRunSettings;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_SNIPPET_TAG: &str = "nbparam-snippet";
const DEFAULT_KERNEL_NAME: &str = "python3";
const DEFAULT_NBRUN_INSTANCE_TYPE: &str = "ml.p3.8xlarge";
const DEFAULT_NBRUN_IMAGE: &str = "notebook-runner-tf";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// A requested snippet needs a setting that is not configured
    #[error("Missing setting for snippet: set {0}")]
    MissingSnippetSetting(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NbParamConfig {
    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Tag attached to the header cell
    pub header_tag: String,

    /// Tag attached to generated snippet cells
    pub snippet_tag: String,

    /// Extensions recognized by the file-reference detector
    pub file_extensions: Vec<String>,

    /// Kernel named in the papermill snippet
    pub kernel_name: String,

    pub nbrun_script_uri: Option<String>,
    pub nbrun_utils_uri: Option<String>,
    pub nbrun_instance_type: String,
    pub nbrun_image: String,
}

impl Default for NbParamConfig {
    /// Loads NBPARAM_* environment variables, falling back to defaults
    fn default() -> Self {
        let log_level = env::var("NBPARAM_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let file_extensions = env::var("NBPARAM_FILE_EXTENSIONS")
            .ok()
            .map(|v| parse_list(&v))
            .unwrap_or_else(|| DEFAULT_FILE_EXTENSIONS.iter().map(|e| e.to_string()).collect());

        Self {
            log_level,
            header_tag: env_or("NBPARAM_HEADER_TAG", DEFAULT_HEADER_TAG),
            snippet_tag: env_or("NBPARAM_SNIPPET_TAG", DEFAULT_SNIPPET_TAG),
            file_extensions,
            kernel_name: env_or("NBPARAM_KERNEL_NAME", DEFAULT_KERNEL_NAME),
            nbrun_script_uri: env_opt("NBPARAM_NBRUN_SCRIPT_URI"),
            nbrun_utils_uri: env_opt("NBPARAM_NBRUN_UTILS_URI"),
            nbrun_instance_type: env_or("NBPARAM_NBRUN_INSTANCE_TYPE", DEFAULT_NBRUN_INSTANCE_TYPE),
            nbrun_image: env_or("NBPARAM_NBRUN_IMAGE", DEFAULT_NBRUN_IMAGE),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl NbParamConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` for an unknown log level, an
    /// empty or whitespace-containing tag, or an unusable extension list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        for (field, tag) in [("header tag", &self.header_tag), ("snippet tag", &self.snippet_tag)] {
            if tag.is_empty() || tag.chars().any(char::is_whitespace) {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid {}: '{}' must be non-empty and contain no whitespace",
                    field, tag
                )));
            }
        }

        if self.header_tag == self.snippet_tag {
            return Err(ConfigError::ValidationFailed(
                "Header tag and snippet tag must differ".to_string(),
            ));
        }

        if self.file_extensions.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "At least one file extension is required".to_string(),
            ));
        }
        if let Some(bad) = self
            .file_extensions
            .iter()
            .find(|e| !e.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid file extension: '{}'",
                bad
            )));
        }

        Ok(())
    }

    /// Settings for the nbrun snippet and loader
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingSnippetSetting` when either nbrun URI is unset.
    pub fn nbrun_settings(&self) -> Result<NbRunSettings, ConfigError> {
        let script_uri = self
            .nbrun_script_uri
            .clone()
            .ok_or_else(|| ConfigError::MissingSnippetSetting("NBPARAM_NBRUN_SCRIPT_URI".to_string()))?;
        let utils_uri = self
            .nbrun_utils_uri
            .clone()
            .ok_or_else(|| ConfigError::MissingSnippetSetting("NBPARAM_NBRUN_UTILS_URI".to_string()))?;

        Ok(NbRunSettings {
            script_uri,
            utils_uri,
            instance_type: self.nbrun_instance_type.clone(),
            image: self.nbrun_image.clone(),
        })
    }

    /// The pass-1 detector chain for this configuration
    pub fn detector_chain(&self) -> DetectorChain {
        DetectorChain::new(&self.file_extensions)
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();

        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert("header_tag".to_string(), self.header_tag.clone());
        map.insert("snippet_tag".to_string(), self.snippet_tag.clone());
        map.insert("file_extensions".to_string(), self.file_extensions.join(","));
        map.insert("kernel_name".to_string(), self.kernel_name.clone());
        if let Some(ref uri) = self.nbrun_script_uri {
            map.insert("nbrun_script_uri".to_string(), uri.clone());
        }
        if let Some(ref uri) = self.nbrun_utils_uri {
            map.insert("nbrun_utils_uri".to_string(), uri.clone());
        }
        map.insert("nbrun_instance_type".to_string(), self.nbrun_instance_type.clone());
        map.insert("nbrun_image".to_string(), self.nbrun_image.clone());

        map
    }
}

impl fmt::Display for NbParamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nbparam Configuration:")?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Header Tag: {}", self.header_tag)?;
        writeln!(f, "  Snippet Tag: {}", self.snippet_tag)?;
        writeln!(f, "  File Extensions: {}", self.file_extensions.join(", "))?;
        writeln!(f, "  Kernel: {}", self.kernel_name)?;
        writeln!(
            f,
            "  nbrun Script: {}",
            self.nbrun_script_uri.as_deref().unwrap_or("(unset)")
        )?;
        writeln!(
            f,
            "  nbrun Utils: {}",
            self.nbrun_utils_uri.as_deref().unwrap_or("(unset)")
        )?;
        writeln!(f, "  nbrun Instance: {}", self.nbrun_instance_type)?;
        writeln!(f, "  nbrun Image: {}", self.nbrun_image)?;
        Ok(())
    }
}
