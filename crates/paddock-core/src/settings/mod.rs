//! Global settings (daily mode).

mod model;
mod repository;

pub use model::AppSettings;
pub use repository::SettingsRepository;
