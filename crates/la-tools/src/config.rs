use std::fs;
use std::path::{Path, PathBuf};

use la_adjacency::{ScanConfig, WriteOptions};
use serde::{Deserialize, Serialize};

use crate::ToolError;

pub const DEFAULT_ADJACENCIES_FILE: &str = "adjacencies.txt";

/// Atlas configuration file.
///
/// Relative `label_file` and `models_directory` paths are resolved against
/// the directory holding the configuration file; a relative
/// `adjacencies_file` is resolved inside `models_directory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AtlasConfig {
    pub label_file: PathBuf,
    pub models_directory: PathBuf,
    #[serde(default = "default_adjacencies_file")]
    pub adjacencies_file: PathBuf,
    /// Largest label written as a line head.
    #[serde(default)]
    pub max_label: Option<u64>,
    #[serde(default)]
    pub include_first_slice: bool,
    #[serde(default)]
    pub parallel: bool,
}

fn default_adjacencies_file() -> PathBuf {
    PathBuf::from(DEFAULT_ADJACENCIES_FILE)
}

impl AtlasConfig {
    pub fn load(path: &Path) -> Result<Self, ToolError> {
        let text = fs::read_to_string(path)
            .map_err(|e| ToolError::config(path, format!("reading config: {e}")))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_json_str(&text, base).map_err(|e| match e {
            ToolError::Configuration { message, .. } => ToolError::config(path, message),
            other => other,
        })
    }

    /// Parses `text` and resolves relative paths against `base_dir`.
    pub fn from_json_str(text: &str, base_dir: &Path) -> Result<Self, ToolError> {
        let mut cfg: Self = serde_json::from_str(text)
            .map_err(|e| ToolError::config("<inline>", format!("parsing json: {e}")))?;

        if cfg.label_file.as_os_str().is_empty() {
            return Err(ToolError::config("<inline>", "'label_file' is empty"));
        }
        if cfg.models_directory.as_os_str().is_empty() {
            return Err(ToolError::config("<inline>", "'models_directory' is empty"));
        }
        if cfg.adjacencies_file.as_os_str().is_empty() {
            return Err(ToolError::config("<inline>", "'adjacencies_file' is empty"));
        }

        cfg.label_file = base_dir.join(&cfg.label_file);
        cfg.models_directory = base_dir.join(&cfg.models_directory);
        Ok(cfg)
    }

    pub fn adjacencies_path(&self) -> PathBuf {
        self.models_directory.join(&self.adjacencies_file)
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            include_first_slice: self.include_first_slice,
            parallel: self.parallel,
        }
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            max_label: self.max_label,
        }
    }
}
