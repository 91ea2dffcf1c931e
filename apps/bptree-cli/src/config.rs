use serde::Deserialize;
use std::path::PathBuf;
use std::{num::NonZeroUsize, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO Error")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Parse Error")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid TOML error")]
    Invalid { message: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub buffer_pages: NonZeroUsize,
    /// Packed key length ceiling, including the NUL terminator. Defaults to
    /// the engine's built-in `btree::MAX_KEY_SIZE` but stays configurable
    /// here so small-page tests can shrink it.
    #[serde(default = "default_max_key_size")]
    pub max_key_size: usize,
}

fn default_max_key_size() -> usize {
    btree::MAX_KEY_SIZE
}

impl Default for EngineConfig {
    /// Falls back to `./data` and `./logs` with a 256-page buffer pool, so
    /// the REPL can start without a `bptree-cli.toml` on disk.
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                data_dir: PathBuf::from("data"),
                logs_dir: PathBuf::from("logs"),
                buffer_pages: NonZeroUsize::new(256).expect("256 is non-zero"),
                max_key_size: btree::MAX_KEY_SIZE,
            },
        }
    }
}

impl EngineConfig {
    /// Loads `path` if it exists, otherwise falls back to [`Default`].
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        let cfg: EngineConfig = toml::from_str(&text).map_err(|e| ConfigError::ParseToml {
            path: path.clone(),
            source: e,
        })?;

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // buffer_pages is already NonZeroUsize, so "0" can't happen.
        // Validate data_dir not empty / etc.
        if self.storage.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                message: "storage.data_dir must not be empty".to_string(),
            });
        }
        if self.storage.max_key_size > btree::MAX_KEY_SIZE {
            return Err(ConfigError::Invalid {
                message: format!(
                    "storage.max_key_size ({}) exceeds the engine's {}-byte ceiling",
                    self.storage.max_key_size,
                    btree::MAX_KEY_SIZE
                ),
            });
        }
        Ok(())
    }
}
