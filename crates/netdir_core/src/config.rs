//! Core configuration loaded from JSON.
//!
//! Every field is optional in the file; missing fields take the defaults
//! below and unknown fields are rejected.

use crate::alias::AliasEngine;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;
pub const MAX_RECOMMENDATION_LIMIT: usize = 50;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// One of trace, debug, info, warn, error. Validated by `init_logging`.
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    /// Real name -> fixed alias, consulted before the pool.
    pub alias_overrides: BTreeMap<String, String>,
    pub recommendation_limit: usize,
    pub database_path: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
            alias_overrides: BTreeMap::new(),
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
            database_path: None,
        }
    }
}

impl CoreConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Configured limit clamped to `1..=MAX_RECOMMENDATION_LIMIT`.
    pub fn recommendation_limit(&self) -> usize {
        self.recommendation_limit.clamp(1, MAX_RECOMMENDATION_LIMIT)
    }

    pub fn alias_engine(&self) -> AliasEngine {
        AliasEngine::with_overrides(
            self.alias_overrides
                .iter()
                .map(|(name, alias)| (name.as_str(), alias.as_str())),
        )
    }
}
