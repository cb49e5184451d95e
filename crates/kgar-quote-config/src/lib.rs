use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

fn default_live_preview() -> bool {
    true
}

/// Settings for the kgar-quote tools. Read-only: nothing writes this file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Vault folder, with `~` and `$VARS` expanded on load.
    pub notes_path: PathBuf,
    /// Start in live preview rather than source mode.
    #[serde(default = "default_live_preview")]
    pub live_preview: bool,
}

impl Config {
    pub fn new(notes_path: impl Into<PathBuf>) -> Self {
        Self {
            notes_path: notes_path.into(),
            live_preview: default_live_preview(),
        }
    }

    /// Loads the config at `config_path`, or `None` when there is no file.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        Self::parse(&content)
            .map(Some)
            .map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/kgar-quote");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(content)?;
        if let Some(expanded) = Self::expand_path(&config.notes_path) {
            config.notes_path = expanded;
        }
        Ok(config)
    }

    /// Expands `~` and environment variables; `None` if a variable is unset.
    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        shellexpand::full(&path_str)
            .ok()
            .map(|expanded| PathBuf::from(expanded.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/kgar-quote/config.toml"));
    }

    #[test]
    fn test_live_preview_defaults_on() {
        let config = Config::parse(r#"notes_path = "/vault""#).unwrap();
        assert_eq!(config, Config::new("/vault"));
        assert!(config.live_preview);
    }

    #[test]
    fn test_live_preview_can_be_disabled() {
        let config = Config::parse(
            r#"
notes_path = "/vault"
live_preview = false
"#,
        )
        .unwrap();
        assert!(!config.live_preview);
    }

    #[test]
    fn test_missing_notes_path_is_a_parse_error() {
        assert!(Config::parse("live_preview = true").is_err());
    }

    #[test]
    fn test_tilde_is_expanded() {
        let config = Config::parse(r#"notes_path = "~/vault""#).unwrap();
        let expanded = config.notes_path.to_string_lossy();
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("vault"));
    }

    #[test]
    fn test_env_var_is_expanded() {
        unsafe {
            env::set_var("KGAR_TEST_VAULT", "/custom/notes");
        }

        let config = Config::parse(r#"notes_path = "$KGAR_TEST_VAULT/kgar""#).unwrap();
        assert_eq!(config.notes_path, PathBuf::from("/custom/notes/kgar"));

        unsafe {
            env::remove_var("KGAR_TEST_VAULT");
        }
    }

    #[test]
    fn test_unset_env_var_is_kept_verbatim() {
        let config = Config::parse(r#"notes_path = "$KGAR_SURELY_UNSET_VAR/x""#).unwrap();
        assert_eq!(config.notes_path, PathBuf::from("$KGAR_SURELY_UNSET_VAR/x"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load_from_path(temp_dir.path().join("nonexistent.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "notes_path = \"/tmp/notes\"\nlive_preview = false\n").unwrap();

        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(loaded.notes_path, PathBuf::from("/tmp/notes"));
        assert!(!loaded.live_preview);
    }

    #[test]
    fn test_load_reports_parse_errors_with_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "notes_path = [").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}
