use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_FUZZY_CACHE_SIZE: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration in {path}: {source}")]
    Format {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Service settings, read from a camelCase JSON file. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceConfig {
    pub bind: SocketAddr,
    pub data_path: PathBuf,
    pub words_of_the_day_path: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub recaptcha_secret: String,
    /// Accept every write without calling the verification service.
    pub skip_verification: bool,
    pub fuzzy_cache_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            data_path: PathBuf::from("dvlf.json"),
            words_of_the_day_path: None,
            static_dir: None,
            recaptcha_secret: String::new(),
            skip_verification: false,
            fuzzy_cache_size: DEFAULT_FUZZY_CACHE_SIZE,
        }
    }
}

impl ServiceConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Format {
            path: path.to_path_buf(),
            source,
        })
    }
}
