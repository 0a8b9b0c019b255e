//! Session domain model.
//!
//! A session is one timed heat for a single skill group. This module holds
//! the entity itself plus the value types that constrain it; the state
//! transitions are implemented here as plain methods so that every caller
//! (lifecycle service, stores, tests) goes through the same checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{PaddockError, Result};

/// Default heat length when a record carries no usable duration.
pub const DEFAULT_DURATION_MINUTES: u32 = 15;

/// Skill bracket a heat is run for.
///
/// Heats rotate `basic → medium → advanced → basic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Basic,
    Medium,
    Advanced,
}

impl Group {
    pub const ALL: [Group; 3] = [Group::Basic, Group::Medium, Group::Advanced];

    /// The group that follows this one in the fixed rotation.
    pub fn next(self) -> Group {
        match self {
            Group::Basic => Group::Medium,
            Group::Medium => Group::Advanced,
            Group::Advanced => Group::Basic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Basic => "basic",
            Group::Medium => "medium",
            Group::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Group {
    type Err = PaddockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Group::Basic),
            "medium" => Ok(Group::Medium),
            "advanced" => Ok(Group::Advanced),
            other => Err(PaddockError::validation(format!("unknown group '{other}'"))),
        }
    }
}

/// Status of a session record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Running,
    Paused,
    Completed,
}

impl SessionStatus {
    /// Running and paused sessions both occupy the single active slot.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Running | SessionStatus::Paused)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Running => "running",
            SessionStatus::Paused => "paused",
            SessionStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heat length an operator may pick when starting a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SessionDuration(u32);

impl SessionDuration {
    /// Durations offered on the operator surface, in minutes.
    pub const ALLOWED_MINUTES: [u32; 5] = [10, 15, 20, 25, 30];

    pub fn minutes(&self) -> u32 {
        self.0
    }
}

impl Default for SessionDuration {
    fn default() -> Self {
        Self(DEFAULT_DURATION_MINUTES)
    }
}

impl TryFrom<u32> for SessionDuration {
    type Error = PaddockError;

    fn try_from(minutes: u32) -> Result<Self> {
        if Self::ALLOWED_MINUTES.contains(&minutes) {
            Ok(Self(minutes))
        } else {
            Err(PaddockError::validation(format!(
                "duration must be one of {:?} minutes, got {minutes}",
                Self::ALLOWED_MINUTES
            )))
        }
    }
}

impl From<SessionDuration> for u32 {
    fn from(duration: SessionDuration) -> Self {
        duration.0
    }
}

/// What happens when a running heat's countdown reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryPolicy {
    /// The operator ends the heat explicitly; the clock just reads 00:00.
    #[default]
    Manual,
    /// The heat is completed by the first expiry check that sees zero remaining.
    AutoComplete,
}

/// One timed heat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    pub group: Group,
    pub status: SessionStatus,
    /// Set when the session starts running
    pub start_time: DateTime<Utc>,
    /// Fixed at start; zero is treated as the default
    pub duration_minutes: u32,
    /// Present if and only if the session is paused
    pub pause_start: Option<DateTime<Utc>>,
    /// Accumulated length of all closed pauses, in milliseconds
    pub total_pause_duration_ms: i64,
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Creates a freshly started, running session.
    pub fn start(group: Group, duration: SessionDuration, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            group,
            status: SessionStatus::Running,
            start_time: now,
            duration_minutes: duration.minutes(),
            pause_start: None,
            total_pause_duration_ms: 0,
            end_time: None,
            created_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Configured heat length in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        let minutes = if self.duration_minutes == 0 {
            DEFAULT_DURATION_MINUTES
        } else {
            self.duration_minutes
        };
        i64::from(minutes) * 60_000
    }

    /// Freezes the countdown.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.status != SessionStatus::Running {
            return Err(PaddockError::validation(format!(
                "cannot pause session {} while it is {}",
                self.id, self.status
            )));
        }
        self.status = SessionStatus::Paused;
        self.pause_start = Some(now);
        Ok(())
    }

    /// Closes the open pause and folds its length into the running total.
    ///
    /// Returns the length of the pause that was closed, in milliseconds.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<i64> {
        if self.status != SessionStatus::Paused {
            return Err(PaddockError::validation(format!(
                "cannot resume session {} while it is {}",
                self.id, self.status
            )));
        }
        let delta = self.close_open_pause(now);
        self.status = SessionStatus::Running;
        Ok(delta)
    }

    /// Finalizes the session. A completed session is never modified again.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<()> {
        if !self.is_active() {
            return Err(PaddockError::validation(format!(
                "session {} is already completed",
                self.id
            )));
        }
        self.close_open_pause(now);
        self.status = SessionStatus::Completed;
        self.end_time = Some(now);
        Ok(())
    }

    fn close_open_pause(&mut self, now: DateTime<Utc>) -> i64 {
        let Some(pause_start) = self.pause_start.take() else {
            return 0;
        };
        // A writer whose clock runs behind the pauser's must not shrink the total.
        let delta = (now - pause_start).num_milliseconds().max(0);
        self.total_pause_duration_ms += delta;
        delta
    }

    /// Checks the record-level invariants a store must refuse to persist.
    pub fn validate(&self) -> Result<()> {
        let paused = self.status == SessionStatus::Paused;
        if paused != self.pause_start.is_some() {
            return Err(PaddockError::validation(format!(
                "session {}: pause_start must be set exactly when paused",
                self.id
            )));
        }
        if self.total_pause_duration_ms < 0 {
            return Err(PaddockError::validation(format!(
                "session {}: negative total pause duration",
                self.id
            )));
        }
        if (self.status == SessionStatus::Completed) != self.end_time.is_some() {
            return Err(PaddockError::validation(format!(
                "session {}: end_time must be set exactly when completed",
                self.id
            )));
        }
        Ok(())
    }

    /// Wall time between start and end, pauses included. `None` until completed.
    pub fn wall_duration_ms(&self) -> Option<i64> {
        self.end_time
            .map(|end| (end - self.start_time).num_milliseconds().max(0))
    }
}
