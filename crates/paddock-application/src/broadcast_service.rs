//! Operator announcements to every user.

use paddock_core::clock::Clock;
use paddock_core::error::{PaddockError, Result};
use paddock_core::notification::{Notification, NotificationDispatcher, NotificationKind};
use std::sync::Arc;

pub struct BroadcastService {
    notifier: Arc<dyn NotificationDispatcher>,
    clock: Arc<dyn Clock>,
}

impl BroadcastService {
    pub fn new(notifier: Arc<dyn NotificationDispatcher>, clock: Arc<dyn Clock>) -> Self {
        Self { notifier, clock }
    }

    /// Sends `body` to everyone, signed by `sender_name`.
    ///
    /// Both are trimmed and must not be blank. The sender goes in
    /// `sender_name` only; the body is delivered as written. Unlike the
    /// automatic notifications, a failed dispatch is returned to the caller
    /// since delivering it is the whole operation.
    pub async fn broadcast(&self, sender_name: &str, body: &str) -> Result<Notification> {
        let sender_name = sender_name.trim();
        let body = body.trim();
        if sender_name.is_empty() {
            return Err(PaddockError::validation("broadcast needs a sender name"));
        }
        if body.is_empty() {
            return Err(PaddockError::validation("broadcast message is empty"));
        }

        let notification = Notification::broadcast(
            NotificationKind::OperatorBroadcast,
            body,
            self.clock.now(),
        )
        .with_sender(sender_name);
        self.notifier.notify(notification.clone()).await?;

        tracing::info!("[BroadcastService] {} sent a broadcast", sender_name);
        Ok(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use paddock_core::clock::ManualClock;
    use paddock_infrastructure::RecordingNotifier;

    fn service(notifier: &RecordingNotifier) -> BroadcastService {
        BroadcastService::new(
            Arc::new(notifier.clone()),
            Arc::new(ManualClock::new(
                Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
            )),
        )
    }

    #[tokio::test]
    async fn test_sender_travels_outside_the_body() {
        let notifier = RecordingNotifier::new();
        let sent = service(&notifier)
            .broadcast(" Race Control ", "  Track closes in 5 minutes\n")
            .await
            .unwrap();

        assert_eq!(sent.kind, NotificationKind::OperatorBroadcast);
        assert_eq!(sent.body, "Track closes in 5 minutes");
        assert!(!sent.body.contains("Race Control"));
        assert_eq!(sent.sender_name.as_deref(), Some("Race Control"));
        assert!(sent.recipient_id.is_none());
        assert_eq!(notifier.sent().await, vec![sent]);
    }

    #[tokio::test]
    async fn test_blank_message_is_not_sent() {
        let notifier = RecordingNotifier::new();
        let service = service(&notifier);

        let err = service.broadcast("Race Control", "   ").await.unwrap_err();
        assert!(err.is_validation());
        let err = service.broadcast("", "Gates open").await.unwrap_err();
        assert!(err.is_validation());
        assert!(notifier.sent().await.is_empty());
    }
}
