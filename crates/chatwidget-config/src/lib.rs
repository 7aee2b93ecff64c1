use chatwidget_engine::ChatOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const CONFIG_DIR: &str = "~/.config/chatwidget";

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

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub webhook_url: String,
    /// Directory holding the saved conversations.
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Sent as `context.source` with every message.
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub messages: Messages,
}

/// Canned texts shown by the widget itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub welcome: String,
    pub error: String,
    pub connection_error: String,
}

impl Default for Messages {
    fn default() -> Self {
        let options = ChatOptions::default();
        Self {
            welcome: options.welcome,
            error: options.error_message,
            connection_error: options.connection_error,
        }
    }
}

fn default_history_path() -> PathBuf {
    Config::config_dir().join("history")
}

fn default_language() -> String {
    ChatOptions::default().language
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_source() -> String {
    ChatOptions::default().source
}

impl Config {
    /// Config for `webhook_url` with every other field defaulted.
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            history_path: default_history_path(),
            language: default_language(),
            timeout_secs: default_timeout_secs(),
            source: default_source(),
            messages: Messages::default(),
        }
    }

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

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the history directory
        config.history_path =
            Self::expand_path(&config.history_path).unwrap_or(config.history_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_dir() -> PathBuf {
        PathBuf::from(shellexpand::tilde(CONFIG_DIR).as_ref())
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Log file written by the terminal front end.
    pub fn log_path() -> PathBuf {
        Self::config_dir().join("chatwidget.log")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn chat_options(&self) -> ChatOptions {
        ChatOptions {
            language: self.language.clone(),
            source: self.source.clone(),
            welcome: self.messages.welcome.clone(),
            error_message: self.messages.error.clone(),
            connection_error: self.messages.connection_error.clone(),
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/chatwidget/config.toml"));
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: Config = toml::from_str(r#"webhook_url = "https://bot.test/hook""#).unwrap();

        assert_eq!(config, Config::new("https://bot.test/hook"));
        assert_eq!(config.language, "en");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.history_path.ends_with(".config/chatwidget/history"));
    }

    #[test]
    fn test_missing_webhook_url_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "language = \"de\"\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_partial_messages_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
webhook_url = "https://bot.test/hook"
language = "de"

[messages]
welcome = "Hallo! Wie kann ich helfen?"
"#,
        )
        .unwrap();

        assert_eq!(config.messages.welcome, "Hallo! Wie kann ich helfen?");
        assert_eq!(config.messages.error, Messages::default().error);

        let options = config.chat_options();
        assert_eq!(options.language, "de");
        assert_eq!(options.welcome, "Hallo! Wie kann ich helfen?");
        assert_eq!(options.connection_error, ChatOptions::default().connection_error);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/history");
        let expanded = Config::expand_path(&path).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/history"));
    }

    #[test]
    fn test_history_path_with_env_var_in_toml() {
        unsafe {
            env::set_var("CHATWIDGET_TEST_ROOT", "/custom/data");
        }

        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "webhook_url = \"https://bot.test/hook\"\nhistory_path = \"$CHATWIDGET_TEST_ROOT/chats\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(config.history_path, PathBuf::from("/custom/data/chats"));

        unsafe {
            env::remove_var("CHATWIDGET_TEST_ROOT");
        }
    }

    #[test]
    fn test_expand_path_with_relative_path() {
        let path = PathBuf::from("relative/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let mut test_config = Config::new("https://bot.test/hook");
        test_config.history_path = PathBuf::from("/tmp/chat-history");
        test_config.timeout_secs = 5;

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }
}
