//! Summary figures for finished heats.

use serde::Serialize;

use super::model::{Group, Session};

/// Wall and pause time of one completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub session_id: String,
    pub group: Group,
    /// End minus start, pauses included
    pub wall_ms: i64,
    /// `None` when the heat was never paused
    pub pause_ms: Option<i64>,
}

impl SessionStats {
    /// Builds stats for a completed session; `None` for active ones.
    pub fn from_session(session: &Session) -> Option<Self> {
        let wall_ms = session.wall_duration_ms()?;
        let pause_ms =
            (session.total_pause_duration_ms > 0).then_some(session.total_pause_duration_ms);
        Some(Self {
            session_id: session.id.clone(),
            group: session.group,
            wall_ms,
            pause_ms,
        })
    }

    pub fn wall_display(&self) -> String {
        format_minutes_seconds(self.wall_ms)
    }

    pub fn pause_display(&self) -> Option<String> {
        self.pause_ms.map(format_minutes_seconds)
    }
}

/// Formats milliseconds as `M:SS` with unpadded minutes.
pub fn format_minutes_seconds(ms: i64) -> String {
    let ms = ms.max(0);
    format!("{}:{:02}", ms / 60_000, (ms % 60_000) / 1_000)
}
