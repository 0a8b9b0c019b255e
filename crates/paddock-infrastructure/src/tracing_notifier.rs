//! Notification dispatcher that only writes to the log.

use async_trait::async_trait;
use paddock_core::error::Result;
use paddock_core::notification::{Notification, NotificationDispatcher};

/// Logs notifications at info level and delivers them nowhere else.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl NotificationDispatcher for TracingNotifier {
    async fn notify(&self, notification: Notification) -> Result<()> {
        tracing::info!(
            target: "paddock::notification",
            kind = %notification.kind,
            recipient = notification.recipient_id.as_deref().unwrap_or("everyone"),
            sender = notification.sender_name.as_deref().unwrap_or("-"),
            "{}",
            notification.body
        );
        Ok(())
    }
}
