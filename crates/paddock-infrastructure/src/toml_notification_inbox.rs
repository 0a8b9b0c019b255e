//! Notification inbox persisted to `notifications.toml`.

use async_trait::async_trait;
use paddock_core::error::Result;
use paddock_core::notification::{Notification, NotificationDispatcher};
use std::path::PathBuf;
use std::sync::Arc;

use crate::dto::InboxDto;
use crate::paths::{PaddockPaths, StoreFile};
use crate::storage::{AtomicTomlFile, run_blocking};

/// Appends every dispatched notification to an inbox file that clients read.
#[derive(Debug, Clone)]
pub struct TomlNotificationInbox {
    file: Arc<AtomicTomlFile<InboxDto>>,
}

impl TomlNotificationInbox {
    pub fn new(paths: &PaddockPaths) -> Self {
        Self::with_path(paths.store_file(StoreFile::Notifications))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }

    /// Notifications addressed to `recipient_id` plus broadcasts, oldest first.
    pub async fn list_for(&self, recipient_id: &str) -> Result<Vec<Notification>> {
        let file = Arc::clone(&self.file);
        let recipient_id = recipient_id.to_string();
        run_blocking(move || {
            let inbox = file.load()?.unwrap_or_default();
            Ok(inbox
                .notifications
                .into_iter()
                .filter(|n| match n.recipient_id.as_deref() {
                    Some(r) => r == recipient_id,
                    None => true,
                })
                .collect())
        })
        .await
    }

    pub async fn list_all(&self) -> Result<Vec<Notification>> {
        let file = Arc::clone(&self.file);
        run_blocking(move || Ok(file.load()?.unwrap_or_default().notifications)).await
    }
}

#[async_trait]
impl NotificationDispatcher for TomlNotificationInbox {
    async fn notify(&self, notification: Notification) -> Result<()> {
        tracing::info!(
            "[Notification] {} -> {}: {}",
            notification.kind,
            notification.recipient_id.as_deref().unwrap_or("everyone"),
            notification.body
        );

        let file = Arc::clone(&self.file);
        run_blocking(move || {
            file.update(|inbox: &mut InboxDto| {
                inbox.notifications.push(notification);
                Ok(())
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use paddock_core::notification::NotificationKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_inbox_filters_by_recipient() {
        let temp_dir = TempDir::new().unwrap();
        let inbox = TomlNotificationInbox::with_path(temp_dir.path().join("notifications.toml"));
        let now = Utc::now();

        inbox
            .notify(Notification::broadcast(
                NotificationKind::SessionLastMinute,
                "One minute left",
                now,
            ))
            .await
            .unwrap();
        inbox
            .notify(
                Notification::to_user(NotificationKind::VoteCastOnMyCar, "u-1", "New vote", now)
                    .with_sender("Mika"),
            )
            .await
            .unwrap();
        inbox
            .notify(Notification::to_user(
                NotificationKind::VoteSummary,
                "u-2",
                "3 votes",
                now,
            ))
            .await
            .unwrap();

        let for_u1 = inbox.list_for("u-1").await.unwrap();
        assert_eq!(for_u1.len(), 2);
        assert_eq!(for_u1[1].sender_name.as_deref(), Some("Mika"));
        assert_eq!(inbox.list_all().await.unwrap().len(), 3);
    }
}
