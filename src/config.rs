//! Configuration resolution.
//!
//! Priority chain:
//! 1. `VAULTDEX_ROOT` environment variable
//! 2. `workspace_path` in `~/.vaultdex/config.json`
//! 3. Current working directory
//!
//! A missing or unreadable config file is not an error; every field has a
//! default relative to the vault root.

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_MEETINGS_DIR: &str = "00-Inbox/Meetings";
pub const DEFAULT_TASKS_FILE: &str = "03-Tasks/Tasks.md";
pub const DEFAULT_CACHE_FILE: &str = "System/Memory/meeting-cache.json";
pub const DEFAULT_RETENTION_DAYS: i64 = 90;

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub vault_root: PathBuf,
    pub meetings_dir: String,
    pub tasks_file: String,
    pub cache_file: String,
    pub retention_days: i64,
}

/// Optional on-disk config shape (`~/.vaultdex/config.json`).
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    workspace_path: Option<String>,
    meetings_dir: Option<String>,
    tasks_file: Option<String>,
    cache_file: Option<String>,
    retention_days: Option<i64>,
}

impl Config {
    /// Resolve configuration from the environment and the optional config
    /// file. Never fails; missing pieces fall back to defaults.
    pub fn resolve() -> Self {
        let file = load_config_file().unwrap_or_default();

        let vault_root = std::env::var("VAULTDEX_ROOT")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| file.workspace_path.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        Self {
            vault_root,
            meetings_dir: file
                .meetings_dir
                .unwrap_or_else(|| DEFAULT_MEETINGS_DIR.to_string()),
            tasks_file: file
                .tasks_file
                .unwrap_or_else(|| DEFAULT_TASKS_FILE.to_string()),
            cache_file: file
                .cache_file
                .unwrap_or_else(|| DEFAULT_CACHE_FILE.to_string()),
            retention_days: file.retention_days.unwrap_or(DEFAULT_RETENTION_DAYS),
        }
    }

    /// Configuration rooted at an explicit vault path, defaults elsewhere.
    pub fn for_root(root: &Path) -> Self {
        Self {
            vault_root: root.to_path_buf(),
            meetings_dir: DEFAULT_MEETINGS_DIR.to_string(),
            tasks_file: DEFAULT_TASKS_FILE.to_string(),
            cache_file: DEFAULT_CACHE_FILE.to_string(),
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }

    pub fn meetings_path(&self) -> PathBuf {
        self.vault_root.join(&self.meetings_dir)
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.vault_root.join(&self.tasks_file)
    }

    pub fn cache_path(&self) -> PathBuf {
        self.vault_root.join(&self.cache_file)
    }
}

fn load_config_file() -> Option<ConfigFile> {
    let path = dirs::home_dir()?.join(".vaultdex").join("config.json");
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            log::warn!("Ignoring unparseable config file: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_root_defaults() {
        let config = Config::for_root(Path::new("/vault"));
        assert_eq!(
            config.meetings_path(),
            PathBuf::from("/vault/00-Inbox/Meetings")
        );
        assert_eq!(config.tasks_path(), PathBuf::from("/vault/03-Tasks/Tasks.md"));
        assert_eq!(
            config.cache_path(),
            PathBuf::from("/vault/System/Memory/meeting-cache.json")
        );
        assert_eq!(config.retention_days, DEFAULT_RETENTION_DAYS);
    }
}
