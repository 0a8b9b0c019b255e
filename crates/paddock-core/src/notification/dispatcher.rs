//! Notification dispatcher trait.

use async_trait::async_trait;

use super::model::Notification;
use crate::error::Result;

/// Outbound channel for notifications (push transport, inbox, log).
///
/// Delivery is advisory: callers report failures through [`notify_or_log`]
/// and never undo the state change that produced the notification.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn notify(&self, notification: Notification) -> Result<()>;
}

/// Sends a notification, logging instead of propagating any failure.
pub async fn notify_or_log(dispatcher: &dyn NotificationDispatcher, notification: Notification) {
    let kind = notification.kind;
    if let Err(e) = dispatcher.notify(notification).await {
        tracing::warn!("[Notification] Failed to dispatch {}: {}", kind, e);
    }
}
