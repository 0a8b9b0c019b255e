//! Global settings domain model.

use serde::{Deserialize, Serialize};

use crate::ballot::Category;

/// Event-wide settings shared by every client.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppSettings {
    /// Which category's ballot is live today. Switching it erases nothing.
    #[serde(default)]
    pub daily_mode: Category,
}

impl AppSettings {
    pub fn new() -> Self {
        Self::default()
    }
}
