//! RON configuration for the planner binary.
//!
//! Precedence, highest first: `--base-url`, `PLANNER_BASE_URL`, the config
//! file, built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::LevelFilter;
use planner_engine::{BackendSettings, DEFAULT_BASE_URL};
use planner_logging::LogDestination;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILENAME: &str = "planner.ron";
pub const BASE_URL_ENV: &str = "PLANNER_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub log: LogDestination,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: None,
            log: LogDestination::Terminal,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads an explicit config file, or `./planner.ron` if it exists.
    ///
    /// A missing default file yields defaults; a missing explicit file is an error.
    /// The second value is the file the config was read from, if any.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILENAME), false),
        };

        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
                return Ok((Self::default(), None));
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()));
            }
        };

        let config = Self::parse(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok((config, Some(path)))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    pub fn level(&self, verbose: bool) -> LevelFilter {
        if verbose {
            return LevelFilter::Debug;
        }
        planner_logging::parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn backend_settings(
        &self,
        env_base_url: Option<String>,
        cli_base_url: Option<String>,
    ) -> BackendSettings {
        let base_url = cli_base_url
            .or(env_base_url.filter(|value| !value.trim().is_empty()))
            .unwrap_or_else(|| self.base_url.clone());
        BackendSettings {
            base_url,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config = AppConfig::parse(r#"(base_url: "http://10.0.0.5:8000", log: Both)"#).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.log, LogDestination::Both);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.request_timeout_secs, None);
    }

    #[test]
    fn request_timeout_is_optional() {
        let config = AppConfig::parse("(request_timeout_secs: Some(600))").unwrap();
        let settings = config.backend_settings(None, None);
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(600)));
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn cli_beats_env_beats_file() {
        let config = AppConfig {
            base_url: "http://file".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(
            config
                .backend_settings(Some("http://env".into()), Some("http://cli".into()))
                .base_url,
            "http://cli"
        );
        assert_eq!(
            config.backend_settings(Some("http://env".into()), None).base_url,
            "http://env"
        );
        assert_eq!(
            config.backend_settings(Some("  ".into()), None).base_url,
            "http://file"
        );
    }

    #[test]
    fn verbose_overrides_configured_level() {
        let config = AppConfig::parse(r#"(log_level: "warn")"#).unwrap();
        assert_eq!(config.level(false), LevelFilter::Warn);
        assert_eq!(config.level(true), LevelFilter::Debug);
    }

    #[test]
    fn explicit_file_is_loaded_and_required() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"(base_url: "http://from-file:8000")"#).unwrap();
        let (config, source) = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.base_url, "http://from-file:8000");
        assert_eq!(source.as_deref(), Some(file.path()));

        let dir = tempfile::TempDir::new().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("missing.ron"))).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(base_url: 42)").unwrap();
        assert!(AppConfig::load(Some(file.path())).is_err());
    }
}
