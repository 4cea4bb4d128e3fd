use crate::git::GitError;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Upper bound on commits walked per layout.
    pub max_commits: usize,
    pub short_id_len: usize,
    /// Label for side commits no branch name reaches.
    pub unknown_branch_label: String,
    /// Fallback branch names, in order, when HEAD is not on a branch.
    pub preferred_branches: Vec<String>,
    /// `chrono` format for commits older than a week.
    pub date_format: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_commits: 2000,
            short_id_len: 7,
            unknown_branch_label: "Unknown branch".to_string(),
            preferred_branches: vec!["main".to_string(), "master".to_string()],
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl HistoryConfig {
    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("history-lanes").join("config.json"))
    }

    /// Load the user configuration, falling back to defaults when it is
    /// missing or unreadable.
    pub fn load() -> Self {
        Self::default_path()
            .and_then(|path| match Self::load_from(&path) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::debug!("Using default config, {} not loaded: {}", path.display(), e);
                    None
                }
            })
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(path) = Self::default_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), GitError> {
        if self.max_commits == 0 {
            return Err(GitError::configuration("max_commits", "must be at least 1"));
        }
        if self.short_id_len == 0 {
            return Err(GitError::configuration("short_id_len", "must be at least 1"));
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(GitError::configuration(
                "date_format",
                format!("'{}' is not a valid strftime format", self.date_format),
            ));
        }
        Ok(())
    }
}
