//! Store settings (flatstore.yaml).
//!
//! Settings decide when a store re-reads its file and whether comments are
//! kept when it writes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::CommentMode;
use crate::error::{Result, StoreError};

/// The name of the settings file the CLI looks for.
pub const SETTINGS_FILENAME: &str = "flatstore.yaml";

/// When a store re-reads its file before answering a read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReloadPolicy {
    /// Only on explicit `force_reload`.
    Never,
    /// Before every operation.
    Always,
    /// When the file's modification time moved since the last load or write.
    #[default]
    #[serde(alias = "intelligent")]
    OnChange,
}

/// Settings shared by all stores opened with them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub reload: ReloadPolicy,
    pub comments: CommentMode,
}

impl StoreSettings {
    /// Load settings from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|_| StoreError::Read {
            path: path.to_path_buf(),
        })?;

        Self::parse(&content)
    }

    /// Parse settings from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| StoreError::Settings {
            message: format!("Invalid settings: {}", e),
            help: Some(format!("Check {} syntax", SETTINGS_FILENAME)),
        })
    }

    /// Load `flatstore.yaml` from `dir` if present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(SETTINGS_FILENAME);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn with_reload(mut self, reload: ReloadPolicy) -> Self {
        self.reload = reload;
        self
    }

    pub fn with_comments(mut self, comments: CommentMode) -> Self {
        self.comments = comments;
        self
    }
}
