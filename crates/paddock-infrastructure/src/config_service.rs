//! Configuration service implementation.
//!
//! Loads `PaddockConfig` from `config.toml` and caches it.

use crate::paths::PaddockPaths;
use crate::storage::AtomicTomlFile;
use paddock_core::config::PaddockConfig;
use paddock_core::error::{PaddockError, Result};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the root configuration.
///
/// A missing config file is not an error; defaults apply.
#[derive(Debug, Clone)]
pub struct ConfigService {
    file: Arc<AtomicTomlFile<PaddockConfig>>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<PaddockConfig>>>,
}

impl ConfigService {
    /// Creates a service reading `path`, or the platform default location.
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => PaddockPaths::config_file().map_err(|e| PaddockError::config(e.to_string()))?,
        };
        Ok(Self {
            file: Arc::new(AtomicTomlFile::new(path)),
            config: Arc::new(RwLock::new(None)),
        })
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<PaddockConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.file.load()?.unwrap_or_default();
        loaded.validate()?;
        tracing::debug!(
            "[ConfigService] Loaded configuration from {:?}",
            self.file.path()
        );

        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    /// Resolves store paths, honouring `storage.data_dir`.
    pub fn paths(&self) -> Result<PaddockPaths> {
        let config = self.get_config()?;
        PaddockPaths::new(config.storage.data_dir.as_deref())
            .map_err(|e| PaddockError::config(e.to_string()))
    }
}
