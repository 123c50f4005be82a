use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the optional run file looked up in the working directory.
pub const CONFIG_FILE: &str = "thesis-tools.yaml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolConfig {
    pub project_root: String,
    pub entry_file: String,
    pub chapters_dir: String,
    pub source_extension: String,
    pub bibliography: String,
    pub citation_root: String,
    pub json_report: String,
    pub xlsx_report: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            project_root: ".".to_string(),
            entry_file: "main.tex".to_string(),
            chapters_dir: "data".to_string(),
            source_extension: "tex".to_string(),
            bibliography: "ref/refs.bib".to_string(),
            citation_root: ".".to_string(),
            json_report: "word_count_report.json".to_string(),
            xlsx_report: "word_count_report.xlsx".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Load the run file at `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<ToolConfig, ConfigError> {
    if !path.exists() {
        return Ok(ToolConfig::default());
    }
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    // an empty yaml document parses to unit, not to a map
    if raw.trim().is_empty() {
        return Ok(ToolConfig::default());
    }
    let cfg: ToolConfig = serde_yaml::from_str(&raw).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    if cfg.extension().is_empty() {
        return Err(ConfigError::Invalid("source_extension must not be empty".into()));
    }
    Ok(cfg)
}

impl ToolConfig {
    /// Extension without a leading dot, e.g. "tex".
    pub fn extension(&self) -> &str {
        self.source_extension.trim().trim_start_matches('.')
    }
    pub fn project_root(&self) -> PathBuf {
        PathBuf::from(&self.project_root)
    }
    pub fn bibliography_path(&self) -> PathBuf {
        PathBuf::from(&self.bibliography)
    }
    pub fn citation_root(&self) -> PathBuf {
        PathBuf::from(&self.citation_root)
    }
}
