//! TOML-based SettingsRepository implementation

use async_trait::async_trait;
use paddock_core::error::Result;
use paddock_core::settings::{AppSettings, SettingsRepository};
use std::path::PathBuf;
use std::sync::Arc;

use crate::paths::{PaddockPaths, StoreFile};
use crate::storage::{AtomicTomlFile, run_blocking};

/// Stores the global settings record in `settings.toml`.
#[derive(Debug, Clone)]
pub struct TomlSettingsRepository {
    file: Arc<AtomicTomlFile<AppSettings>>,
}

impl TomlSettingsRepository {
    pub fn new(paths: &PaddockPaths) -> Self {
        Self::with_path(paths.store_file(StoreFile::Settings))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }
}

#[async_trait]
impl SettingsRepository for TomlSettingsRepository {
    async fn get_settings(&self) -> Result<AppSettings> {
        let file = Arc::clone(&self.file);
        run_blocking(move || Ok(file.load()?.unwrap_or_default())).await
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        let file = Arc::clone(&self.file);
        let settings = settings.clone();
        run_blocking(move || {
            file.update(|current: &mut AppSettings| {
                *current = settings;
                Ok(())
            })
        })
        .await
    }
}
