//! TOML-based SessionRepository implementation

use async_trait::async_trait;
use paddock_core::error::Result;
use paddock_core::session::{Session, SessionRepository, SessionSnapshot};
use std::path::PathBuf;
use std::sync::Arc;

use crate::dto::SessionStoreDto;
use crate::paths::{PaddockPaths, StoreFile};
use crate::records::SessionSlots;
use crate::storage::{AtomicTomlFile, run_blocking};

/// Stores the active slot and completed history in one `sessions.toml`.
///
/// Every `save` is a locked read-modify-write of the whole document, so the
/// slot rules are checked against the latest state even when several
/// processes share the data directory.
///
/// ```text
/// [active]
/// id = "..."
/// status = "paused"
/// ...
///
/// [[history]]
/// id = "..."
/// status = "completed"
/// ```
#[derive(Debug, Clone)]
pub struct TomlSessionRepository {
    file: Arc<AtomicTomlFile<SessionStoreDto>>,
}

impl TomlSessionRepository {
    pub fn new(paths: &PaddockPaths) -> Self {
        Self::with_path(paths.store_file(StoreFile::Sessions))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }

    async fn read_slots(&self) -> Result<SessionSlots> {
        let file = Arc::clone(&self.file);
        run_blocking(move || {
            let dto = file.load()?.unwrap_or_default();
            SessionSlots::try_from(dto)
        })
        .await
    }
}

#[async_trait]
impl SessionRepository for TomlSessionRepository {
    async fn find_active(&self) -> Result<Option<Session>> {
        Ok(self.read_slots().await?.active)
    }

    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        Ok(self.read_slots().await?.find_by_id(session_id).cloned())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let file = Arc::clone(&self.file);
        let session_id = session.id.clone();
        let status = session.status;
        let session = session.clone();
        run_blocking(move || {
            file.update(|dto: &mut SessionStoreDto| {
                let mut slots = SessionSlots::try_from(std::mem::take(dto))?;
                slots.apply_save(&session)?;
                *dto = SessionStoreDto::from(&slots);
                Ok(())
            })
        })
        .await?;

        tracing::debug!(
            "[TomlSessionRepository] Saved session {} as {}",
            session_id,
            status
        );
        Ok(())
    }

    async fn list_completed(&self, limit: usize) -> Result<Vec<Session>> {
        Ok(self.read_slots().await?.completed_newest_first(limit))
    }

    async fn snapshot(&self) -> Result<SessionSnapshot> {
        let slots = self.read_slots().await?;
        Ok(SessionSnapshot {
            last_completed: slots.history.last().cloned(),
            active: slots.active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use paddock_core::session::{Group, SessionDuration, SessionStatus};
    use tempfile::TempDir;

    fn repository(temp_dir: &TempDir) -> TomlSessionRepository {
        TomlSessionRepository::with_path(temp_dir.path().join("sessions.toml"))
    }

    #[tokio::test]
    async fn test_active_session_round_trips_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);
        let now = Utc::now();

        let mut session = Session::start(Group::Medium, SessionDuration::default(), now);
        repo.save(&session).await.unwrap();
        session.pause(now + Duration::minutes(3)).unwrap();
        repo.save(&session).await.unwrap();

        let reopened = repository(&temp_dir);
        let active = reopened.find_active().await.unwrap().unwrap();
        assert_eq!(active, session);
        assert_eq!(active.status, SessionStatus::Paused);
    }

    #[tokio::test]
    async fn test_completed_sessions_listed_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);
        let now = Utc::now();

        let mut ids = Vec::new();
        for (i, group) in Group::ALL.iter().enumerate() {
            let started = now + Duration::minutes(20 * i as i64);
            let mut session = Session::start(*group, SessionDuration::default(), started);
            repo.save(&session).await.unwrap();
            session.complete(started + Duration::minutes(15)).unwrap();
            repo.save(&session).await.unwrap();
            ids.push(session.id.clone());
        }

        let listed: Vec<_> = repo
            .list_completed(2)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(listed, vec![ids[2].clone(), ids[1].clone()]);

        let snapshot = repo.snapshot().await.unwrap();
        assert!(snapshot.active.is_none());
        assert_eq!(snapshot.last_completed.map(|s| s.id), Some(ids[2].clone()));
        assert!(repo.find_by_id(&ids[0]).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_second_start_is_refused_and_file_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);
        let now = Utc::now();

        let first = Session::start(Group::Basic, SessionDuration::default(), now);
        repo.save(&first).await.unwrap();
        let second = Session::start(Group::Advanced, SessionDuration::default(), now);
        assert!(repo.save(&second).await.unwrap_err().is_conflict());

        assert_eq!(repo.find_active().await.unwrap().map(|s| s.id), Some(first.id));
    }

    #[tokio::test]
    async fn test_legacy_string_pause_duration_is_read() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("sessions.toml"),
            r#"
[active]
id = "legacy"
group = "advanced"
status = "running"
start_time = "2024-06-01T10:00:00Z"
total_pause_duration = "45000"
"#,
        )
        .unwrap();

        let active = repository(&temp_dir).find_active().await.unwrap().unwrap();
        assert_eq!(active.total_pause_duration_ms, 45_000);
        assert_eq!(active.duration_minutes, 15);
    }
}
