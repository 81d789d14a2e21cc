//! Configuration for applications embedding the hook and for the CLI.

mod env;

use crate::sender::endpoint;
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Environment error: {0}")]
    EnvError(String),
}

/// Verbosity of logbeat's own diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Args, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Opbeat organization id
    #[arg(long, env = "LOGBEAT_ORG_ID", default_value = "")]
    pub org_id: String,

    /// Opbeat application id
    #[arg(long, env = "LOGBEAT_APP_ID", default_value = "")]
    pub app_id: String,

    /// Secret token used as the bearer credential
    #[arg(long, env = "LOGBEAT_SECRET_TOKEN", default_value = "", hide_env_values = true)]
    pub secret_token: String,

    /// Log level for logbeat's own diagnostics [default: warn]
    #[arg(long, env = "LOGBEAT_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Configuration file path (optional)
    #[serde(skip)]
    #[arg(long = "config", env = "LOGBEAT_CONFIG")]
    pub config_file: Option<PathBuf>,
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&contents)?;
        config.config_file = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        env::load_env_string("LOGBEAT_ORG_ID", &mut config.org_id);
        env::load_env_string("LOGBEAT_APP_ID", &mut config.app_id);
        env::load_env_string("LOGBEAT_SECRET_TOKEN", &mut config.secret_token);
        env::load_env_path_opt("LOGBEAT_CONFIG", &mut config.config_file);

        if let Ok(level) = std::env::var("LOGBEAT_LOG_LEVEL") {
            config.log_level = Some(LogLevel::from_str(&level, true).map_err(|_| {
                ConfigError::EnvError(format!("Invalid LOGBEAT_LOG_LEVEL: {level}"))
            })?);
        }

        config.resolve()
    }

    /// Fills fields left empty from the config file, if one is set, then
    /// validates the result.
    pub fn resolve(mut self) -> Result<Self, ConfigError> {
        if let Some(path) = self.config_file.clone() {
            let contents = std::fs::read_to_string(&path)?;
            let file: Config = toml::from_str(&contents)?;
            self.merge_missing(file);
        }
        self.validate()?;
        Ok(self)
    }

    fn merge_missing(&mut self, other: Config) {
        if self.org_id.is_empty() {
            self.org_id = other.org_id;
        }
        if self.app_id.is_empty() {
            self.app_id = other.app_id;
        }
        if self.secret_token.is_empty() {
            self.secret_token = other.secret_token;
        }
        if self.log_level.is_none() {
            self.log_level = other.log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_id("org_id", &self.org_id)?;
        validate_id("app_id", &self.app_id)?;

        if self.secret_token.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "secret_token must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Effective diagnostics level, `warn` unless set.
    pub fn log_level(&self) -> LogLevel {
        self.log_level.unwrap_or_default()
    }

    /// Intake URL errors for this organization/app are posted to.
    pub fn endpoint(&self) -> String {
        endpoint(&self.org_id, &self.app_id)
    }
}

fn validate_id(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidConfig(format!("{name} must not be empty")));
    }
    if let Some(c) = value
        .chars()
        .find(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace())
    {
        return Err(ConfigError::InvalidConfig(format!(
            "{name} contains invalid character {c:?}: {value}"
        )));
    }
    Ok(())
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("org_id", &self.org_id)
            .field("app_id", &self.app_id)
            .field("secret_token", &"<redacted>")
            .field("log_level", &self.log_level)
            .field("config_file", &self.config_file)
            .finish()
    }
}
