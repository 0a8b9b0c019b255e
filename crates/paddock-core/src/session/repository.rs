//! Session repository trait.
//!
//! Defines the interface for session persistence operations.

use super::model::Session;
use crate::error::Result;
use async_trait::async_trait;

/// What a client fetches on each session poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// The running or paused session, if any
    pub active: Option<Session>,
    /// The most recently completed session, if any
    pub last_completed: Option<Session>,
}

/// An abstract store holding the single active session slot and the
/// append-only history of completed sessions.
///
/// # Implementation Notes
///
/// `save` is the only write and must behave as one atomic record write:
/// - a running/paused session fills the active slot when it is empty or
///   already holds the same id, and fails with `Conflict` when a different
///   session occupies it
/// - a completed session leaves the active slot and is appended to history
/// - a session id already in history is immutable; saving it again fails
///   with `Validation`
/// - records failing [`Session::validate`] are refused
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Returns the session currently occupying the active slot.
    async fn find_active(&self) -> Result<Option<Session>>;

    /// Finds a session by its ID, active or completed.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: Session found
    /// - `Ok(None)`: Session not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>>;

    /// Persists a session according to the slot rules above.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Lists completed sessions, most recent first.
    async fn list_completed(&self, limit: usize) -> Result<Vec<Session>>;

    /// Reads the active slot and the latest completed session together.
    async fn snapshot(&self) -> Result<SessionSnapshot> {
        let active = self.find_active().await?;
        let last_completed = self.list_completed(1).await?.into_iter().next();
        Ok(SessionSnapshot {
            active,
            last_completed,
        })
    }
}
