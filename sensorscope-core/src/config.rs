//! Key-value configuration source
//!
//! Connection parameters and display overrides come from a plain text file
//! of `KEY=VALUE` lines, the same format docker-compose `.env` files use:
//!
//! ```text
//! # InfluxDB bootstrap
//! DOCKER_INFLUXDB_INIT_ORG=lab
//! DOCKER_INFLUXDB_INIT_ADMIN_TOKEN=secret==
//! ```
//!
//! Lines starting with `#` and blank lines are skipped. A line is split at
//! its first `=`, so values may themselves contain `=`. A later duplicate key
//! replaces an earlier one.
//!
//! The parsed `EnvConfig` is an ordinary value handed to whoever needs it;
//! nothing here is cached or global. Missing keys are reported as
//! `ConfigError::MissingKey` and never replaced by defaults.

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::str::FromStr;

use crate::errors::{ConfigError, ConfigResult};

/// Parsed `KEY=VALUE` configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    entries: BTreeMap<String, String>,
}

impl EnvConfig {
    /// Parse configuration text
    pub fn parse(text: &str) -> ConfigResult<Self> {
        let mut entries = BTreeMap::new();

        for (i, line) in text.lines().enumerate() {
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            let (key, value) = line
                .trim()
                .split_once('=')
                .ok_or(ConfigError::Malformed { line: i + 1 })?;
            entries.insert(key.into(), value.into());
        }

        Ok(Self { entries })
    }

    /// Read and parse a configuration file
    #[cfg(feature = "std")]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            reason: alloc::format!("{}: {}", path.display(), e),
        })?;
        let config = Self::parse(&text)?;
        log_debug!("loaded {} keys from {}", config.len(), path.display());
        Ok(config)
    }

    /// Value for `key`, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Value for `key`, or `MissingKey`
    pub fn require(&self, key: &str) -> ConfigResult<&str> {
        self.get(key).ok_or_else(|| ConfigError::MissingKey { key: key.into() })
    }

    /// Parsed value for `key`; `Ok(None)` when absent, an error when unparsable
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> ConfigResult<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw.trim().parse().map(Some).map_err(|_| ConfigError::InvalidValue {
                key: key.into(),
                value: raw.into(),
            }),
        }
    }

    /// Parsed value for `key`, failing when absent or unparsable
    pub fn require_parsed<T: FromStr>(&self, key: &str) -> ConfigResult<T> {
        self.get_parsed(key)?
            .ok_or_else(|| ConfigError::MissingKey { key: key.into() })
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no keys were defined
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys and values in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
