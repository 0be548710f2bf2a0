//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Label used by `start`/`stop` when `-l` is omitted.
pub const DEFAULT_LABEL: &str = "work";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
    /// Label used when a command does not name one.
    pub default_label: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("timekeep.sqlite"),
            default_label: DEFAULT_LABEL.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: built-in defaults, `<config dir>/timekeep/config.toml`,
    /// the file passed with `--config`, then `TIMEKEEP_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // TIMEKEEP_DATABASE_PATH, TIMEKEEP_DEFAULT_LABEL
        figment = figment.merge(Env::prefixed("TIMEKEEP_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for timekeep.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("timekeep"))
}

/// Returns the platform-specific data directory for timekeep.
///
/// On Linux: `~/.local/share/timekeep`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("timekeep"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_ends_with_timekeep() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "timekeep");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("timekeep.sqlite"));
        assert_eq!(config.default_label, "work");
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timekeep.toml");
        std::fs::write(
            &path,
            "database_path = \"/srv/hours.sqlite\"\ndefault_label = \"writing\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/srv/hours.sqlite"));
        assert_eq!(config.default_label, "writing");
    }

    #[test]
    fn test_partial_config_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timekeep.toml");
        std::fs::write(&path, "default_label = \"reading\"\n").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.default_label, "reading");
        assert_eq!(
            config.database_path.file_name().unwrap(),
            "timekeep.sqlite"
        );
    }

    #[test]
    fn test_malformed_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timekeep.toml");
        std::fs::write(&path, "default_label = [").unwrap();

        assert!(Config::load_from(Some(&path)).is_err());
    }
}
