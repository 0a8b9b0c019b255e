//! Settings repository trait.

use async_trait::async_trait;

use super::model::AppSettings;
use crate::ballot::Category;
use crate::error::Result;

/// Repository for the global settings record.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Loads the settings, falling back to defaults when none are stored.
    async fn get_settings(&self) -> Result<AppSettings>;

    async fn save_settings(&self, settings: &AppSettings) -> Result<()>;

    /// The category whose ballot is currently live.
    async fn daily_mode(&self) -> Result<Category> {
        Ok(self.get_settings().await?.daily_mode)
    }

    async fn set_daily_mode(&self, category: Category) -> Result<()> {
        let mut settings = self.get_settings().await?;
        settings.daily_mode = category;
        self.save_settings(&settings).await
    }
}
