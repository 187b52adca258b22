use crate::translate::{HintPolicy, Table};
use log::{debug, warn};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config format: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings read from `janus.toml`. Every field is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JanusConfig {
    /// Version that wrote the file; a mismatch is only reported.
    pub version: Option<String>,
    pub table: Option<Table>,
    /// Entries per direction in the translation cache; 0 or absent disables it.
    pub cache_capacity: Option<usize>,
    pub hint_multiplier: Option<usize>,
    pub hint_minimum: Option<usize>,
}

impl JanusConfig {
    /// `<config dir>/janus/janus.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("janus").join("janus.toml"))
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Self::parse(&content)
    }

    /// Load `explicit` if given, otherwise the default file when it exists.
    /// A missing default file yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            Some(path) => {
                warn!("Config file not found: {}", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Whether the file's version matches this build. Logs a warning if not.
    pub fn check_version(&self) -> bool {
        match &self.version {
            Some(version) if version != env!("CARGO_PKG_VERSION") => {
                warn!(
                    "Version {version} from config file does not match {}",
                    env!("CARGO_PKG_VERSION")
                );
                false
            }
            _ => true,
        }
    }

    pub fn table(&self) -> Table {
        self.table.unwrap_or_default()
    }

    pub fn cache_capacity(&self) -> Option<NonZeroUsize> {
        self.cache_capacity.and_then(NonZeroUsize::new)
    }

    pub fn hint_policy(&self) -> HintPolicy {
        let defaults = HintPolicy::default();
        HintPolicy {
            multiplier: self.hint_multiplier.unwrap_or(defaults.multiplier),
            minimum: self.hint_minimum.unwrap_or(defaults.minimum),
        }
    }
}
