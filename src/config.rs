use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::storage::StoreOptions;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UniversityConfig {
    pub database: Option<PathBuf>,
    pub foreign_keys: Option<bool>,
}

impl UniversityConfig {
    /// Database path from the file, or the default `university.db`
    pub fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(default_database_path)
    }

    /// Apply command-line values; a flag that is set always wins over the file
    pub fn with_overrides(mut self, database: Option<PathBuf>, no_foreign_keys: bool) -> Self {
        if database.is_some() {
            self.database = database;
        }
        if no_foreign_keys {
            self.foreign_keys = Some(false);
        }
        self
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            foreign_keys: self.foreign_keys.unwrap_or(true),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("university.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("university.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<UniversityConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: UniversityConfig = toml::from_str(&contents)?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(Some(config))
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UniversityConfig::default();
        assert_eq!(config.database_path(), PathBuf::from("university.db"));
        assert!(config.store_options().foreign_keys);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("university.toml");
        std::fs::write(&path, "database = \"data/campus.db\"\nforeign_keys = false\n").unwrap();

        let config = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.database_path(), PathBuf::from("data/campus.db"));
        assert!(!config.store_options().foreign_keys);
    }

    #[test]
    fn test_flag_disables_foreign_keys_over_file() {
        let file: UniversityConfig = toml::from_str("foreign_keys = true\n").unwrap();
        let config = file.with_overrides(None, true);
        assert_eq!(config.store_options(), StoreOptions { foreign_keys: false });
    }

    #[test]
    fn test_file_setting_kept_without_flag() {
        let file: UniversityConfig = toml::from_str("foreign_keys = false\n").unwrap();
        let config = file.with_overrides(None, false);
        assert_eq!(config.store_options(), StoreOptions { foreign_keys: false });
    }

    #[test]
    fn test_database_flag_replaces_file_path() {
        let file: UniversityConfig = toml::from_str("database = \"from_file.db\"\n").unwrap();
        assert_eq!(file.clone().with_overrides(None, false).database_path(), PathBuf::from("from_file.db"));

        let config = file.with_overrides(Some(PathBuf::from("/tmp/cli.db")), false);
        assert_eq!(config.database_path(), PathBuf::from("/tmp/cli.db"));
        assert!(config.store_options().foreign_keys);
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).unwrap().is_none());
    }

    #[test]
    fn test_ensure_db_dir_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("university.db");
        ensure_db_dir(&db).unwrap();
        assert!(db.parent().unwrap().is_dir());
    }
}
