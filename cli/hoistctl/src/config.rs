//! Runtime configuration from the environment.

use anyhow::{bail, Result};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => bail!("unknown log format '{other}' (expected json or pretty)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    /// Worker version used by `render` when `--version` is not given.
    pub worker_version: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let log_level = lookup("HOIST_LOG_LEVEL").unwrap_or_else(|| "warn".to_string());

        let log_format = lookup("HOIST_LOG_FORMAT")
            .map(|v| v.parse())
            .transpose()?
            .unwrap_or(LogFormat::Pretty);

        let worker_version = lookup("HOIST_WORKER_VERSION").filter(|v| !v.is_empty());

        Ok(Self {
            log_level,
            log_format,
            worker_version,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.worker_version, None);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HOIST_LOG_LEVEL", "debug"),
            ("HOIST_LOG_FORMAT", "JSON"),
            ("HOIST_WORKER_VERSION", "2024.1"),
        ]))
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.worker_version.as_deref(), Some("2024.1"));
    }

    #[test]
    fn test_empty_worker_version_ignored() {
        let config = Config::from_lookup(lookup(&[("HOIST_WORKER_VERSION", "")])).unwrap();
        assert_eq!(config.worker_version, None);
    }

    #[test]
    fn test_bad_log_format() {
        assert!(Config::from_lookup(lookup(&[("HOIST_LOG_FORMAT", "xml")])).is_err());
    }
}
