//! TOML-based RosterRepository implementation

use async_trait::async_trait;
use paddock_core::ballot::Category;
use paddock_core::error::Result;
use paddock_core::roster::{Car, RosterRepository, Voter};
use std::path::PathBuf;
use std::sync::Arc;

use crate::dto::RosterDto;
use crate::paths::{PaddockPaths, StoreFile};
use crate::storage::{AtomicTomlFile, run_blocking};

/// Reads voters and cars from `roster.toml`.
///
/// ```text
/// [[voter]]
/// id = "u-1"
/// name = "Kei"
/// role = "driver"
/// vote_weight = 2
///
/// [[car]]
/// id = "c-1"
/// owner_id = "u-1"
/// category = "drift"
/// brand = "Nissan"
/// model = "Silvia S15"
/// ```
///
/// The file is re-read on every lookup so hand edits apply immediately.
#[derive(Debug, Clone)]
pub struct TomlRosterRepository {
    file: Arc<AtomicTomlFile<RosterDto>>,
}

impl TomlRosterRepository {
    pub fn new(paths: &PaddockPaths) -> Self {
        Self::with_path(paths.store_file(StoreFile::Roster))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }

    async fn load(&self) -> Result<RosterDto> {
        let file = Arc::clone(&self.file);
        run_blocking(move || Ok(file.load()?.unwrap_or_default())).await
    }
}

#[async_trait]
impl RosterRepository for TomlRosterRepository {
    async fn find_voter(&self, voter_id: &str) -> Result<Option<Voter>> {
        Ok(self
            .load()
            .await?
            .voters
            .into_iter()
            .find(|v| v.id == voter_id))
    }

    async fn find_car(&self, car_id: &str) -> Result<Option<Car>> {
        Ok(self.load().await?.cars.into_iter().find(|c| c.id == car_id))
    }

    async fn list_cars(&self, category: Category) -> Result<Vec<Car>> {
        Ok(self
            .load()
            .await?
            .cars
            .into_iter()
            .filter(|c| c.category == category)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddock_core::roster::Role;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_hand_written_roster() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("roster.toml");
        std::fs::write(
            &path,
            r#"
[[voter]]
id = "u-1"
name = "Kei"
role = "driver"
vote_weight = 2

[[voter]]
id = "u-2"
name = "Mika"

[[car]]
id = "c-1"
owner_id = "u-1"
category = "drift"
brand = "Nissan"
model = "Silvia S15"
registration_number = "KR 1234"

[[car]]
id = "c-2"
owner_id = "u-1"
category = "time_attack"
brand = "Honda"
model = "Civic"
"#,
        )
        .unwrap();

        let roster = TomlRosterRepository::with_path(path);
        let kei = roster.find_voter("u-1").await.unwrap().unwrap();
        assert_eq!(kei.role, Role::Driver);
        assert_eq!(kei.vote_weight.get(), 2);

        let mika = roster.find_voter("u-2").await.unwrap().unwrap();
        assert_eq!(mika.role, Role::Spectator);
        assert_eq!(mika.vote_weight.get(), 1);

        let drift = roster.list_cars(Category::Drift).await.unwrap();
        assert_eq!(drift.len(), 1);
        assert_eq!(drift[0].label(), "Nissan Silvia S15 (KR 1234)");
        assert!(roster.find_car("c-9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_roster_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let roster = TomlRosterRepository::with_path(temp_dir.path().join("roster.toml"));
        assert!(roster.find_voter("u-1").await.unwrap().is_none());
        assert!(roster.list_cars(Category::TimeAttack).await.unwrap().is_empty());
    }
}
