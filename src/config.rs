//! Local configuration: who the user is and which defaults the task
//! shorthand falls back to.
//!
//! Stored as `<home>/config.json`. A missing file means every default applies.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShipError};
use crate::shorthand::TaskDefaults;

pub const CONFIG_FILE: &str = "config.json";
pub const DB_FILE: &str = "ship.json";

/// Identity recorded as project owner and task author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_user_name")]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

fn default_user_name() -> String {
    "Unknown".to_string()
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            name: default_user_name(),
            email: String::new(),
        }
    }
}

impl UserConfig {
    /// Value stamped into `created_by` fields: the email when set, else the name.
    pub fn author(&self) -> Option<String> {
        if !self.email.is_empty() {
            Some(self.email.clone())
        } else if !self.name.is_empty() {
            Some(self.name.clone())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub user: UserConfig,
    #[serde(default)]
    pub defaults: TaskDefaults,
}

impl Config {
    pub fn load(home: &Path) -> Result<Self> {
        let path = home.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, home: &Path) -> Result<()> {
        fs::create_dir_all(home)?;
        let path = home.join(CONFIG_FILE);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(self)?)?;
        fs::rename(tmp, path)?;
        Ok(())
    }
}

/// Data directory: the explicit `--home`/`SHIP_HOME` value, else `$HOME/.ship`.
pub fn resolve_home(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(home) = explicit {
        return Ok(home);
    }
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(|h| PathBuf::from(h).join(".ship"))
        .ok_or(ShipError::HomeNotFound)
}

/// Document file: the explicit `--db` value, else `<home>/ship.json`.
pub fn resolve_db_path(home: &Path, explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| home.join(DB_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Priority, TaskType};

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.user.name, "Unknown");
        assert_eq!(cfg.user.email, "");
        assert_eq!(cfg.defaults.task_type, TaskType::General);
        assert_eq!(cfg.defaults.priority, Priority::Low);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"defaults": {"priority": "medium"}}"#,
        )
        .unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.user.name, "Unknown");
        assert_eq!(cfg.defaults.task_type, TaskType::General);
        assert_eq!(cfg.defaults.priority, Priority::Medium);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("nested");
        let mut cfg = Config::default();
        cfg.user.name = "Ada".into();
        cfg.user.email = "ada@example.com".into();
        cfg.defaults.task_type = TaskType::Feature;
        cfg.save(&home).unwrap();
        assert_eq!(Config::load(&home).unwrap(), cfg);
    }

    #[test]
    fn test_author_prefers_email() {
        let mut user = UserConfig::default();
        assert_eq!(user.author().as_deref(), Some("Unknown"));
        user.email = "a@b.c".into();
        assert_eq!(user.author().as_deref(), Some("a@b.c"));
        user.email.clear();
        user.name.clear();
        assert_eq!(user.author(), None);
    }

    #[test]
    fn test_explicit_paths_win() {
        let home = resolve_home(Some(PathBuf::from("/tmp/ship-home"))).unwrap();
        assert_eq!(home, PathBuf::from("/tmp/ship-home"));
        assert_eq!(resolve_db_path(&home, None), home.join(DB_FILE));
        assert_eq!(
            resolve_db_path(&home, Some(PathBuf::from("/tmp/other.json"))),
            PathBuf::from("/tmp/other.json")
        );
    }
}
