//! Notification domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Events the core announces to the notification collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// The running heat entered its last minute
    SessionLastMinute,
    /// A heat started; drivers of the next group should get ready
    SessionGroupUpcoming,
    /// Somebody voted for the recipient's car
    VoteCastOnMyCar,
    /// Periodic digest of votes a car received
    VoteSummary,
    /// Free-text message from the event operator to everyone
    #[serde(rename = "broadcast")]
    OperatorBroadcast,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::SessionLastMinute => "session_last_minute",
            NotificationKind::SessionGroupUpcoming => "session_group_upcoming",
            NotificationKind::VoteCastOnMyCar => "vote_cast_on_my_car",
            NotificationKind::VoteSummary => "vote_summary",
            NotificationKind::OperatorBroadcast => "broadcast",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured notification payload.
///
/// The sender travels in its own field; it is never encoded into `body`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    /// Target user; `None` addresses everyone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates a broadcast notification.
    pub fn broadcast(kind: NotificationKind, body: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            kind,
            recipient_id: None,
            body: body.into(),
            sender_name: None,
            created_at: now,
        }
    }

    /// Creates a notification for a single user.
    pub fn to_user(
        kind: NotificationKind,
        recipient_id: impl Into<String>,
        body: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            recipient_id: Some(recipient_id.into()),
            ..Self::broadcast(kind, body, now)
        }
    }

    pub fn with_sender(mut self, sender_name: impl Into<String>) -> Self {
        self.sender_name = Some(sender_name.into());
        self
    }
}
