//! Store-agnostic record sets and the constraint rules every backend shares.
//!
//! The TOML files and the in-memory stores both load into these structures,
//! apply one write under their own lock, and persist the result.

use chrono::{DateTime, Utc};
use paddock_core::ballot::{Category, Vote, VoteCancellation};
use paddock_core::error::{PaddockError, Result};
use paddock_core::session::Session;

use crate::dto::{LedgerDto, SessionDto, SessionStoreDto, VoteDto};

/// The active session slot plus completed history, oldest first.
#[derive(Debug, Clone, Default)]
pub(crate) struct SessionSlots {
    pub active: Option<Session>,
    pub history: Vec<Session>,
}

impl SessionSlots {
    pub fn find_by_id(&self, session_id: &str) -> Option<&Session> {
        self.active
            .iter()
            .chain(self.history.iter())
            .find(|s| s.id == session_id)
    }

    pub fn completed_newest_first(&self, limit: usize) -> Vec<Session> {
        self.history.iter().rev().take(limit).cloned().collect()
    }

    /// Applies one session write following the slot rules of `SessionRepository`.
    pub fn apply_save(&mut self, session: &Session) -> Result<()> {
        session.validate()?;

        if self.history.iter().any(|s| s.id == session.id) {
            return Err(PaddockError::validation(format!(
                "session {} is completed and cannot be modified",
                session.id
            )));
        }

        if let Some(active) = &self.active {
            if active.id != session.id && session.is_active() {
                return Err(PaddockError::conflict(format!(
                    "session {} is already active",
                    active.id
                )));
            }
        }

        if session.is_active() {
            self.active = Some(session.clone());
        } else {
            if self.active.as_ref().is_some_and(|a| a.id == session.id) {
                self.active = None;
            }
            self.history.push(session.clone());
        }
        Ok(())
    }
}

impl TryFrom<SessionStoreDto> for SessionSlots {
    type Error = PaddockError;

    fn try_from(dto: SessionStoreDto) -> Result<Self> {
        Ok(Self {
            active: dto.active.map(Session::try_from).transpose()?,
            history: dto
                .history
                .into_iter()
                .map(Session::try_from)
                .collect::<Result<_>>()?,
        })
    }
}

impl From<&SessionSlots> for SessionStoreDto {
    fn from(slots: &SessionSlots) -> Self {
        Self {
            active: slots.active.as_ref().map(SessionDto::from),
            history: slots.history.iter().map(SessionDto::from).collect(),
        }
    }
}

/// Active votes plus the permanent cancellation markers.
#[derive(Debug, Clone, Default)]
pub(crate) struct LedgerRecords {
    pub votes: Vec<Vote>,
    pub cancellations: Vec<VoteCancellation>,
}

impl LedgerRecords {
    pub fn find_vote(&self, user_id: &str, category: Category) -> Option<&Vote> {
        self.votes
            .iter()
            .find(|v| v.user_id == user_id && v.category == category)
    }

    pub fn find_cancellation(&self, user_id: &str, category: Category) -> Option<&VoteCancellation> {
        self.cancellations
            .iter()
            .find(|c| c.user_id == user_id && c.category == category)
    }

    pub fn insert_vote(&mut self, vote: &Vote) -> Result<()> {
        if self.find_vote(&vote.user_id, vote.category).is_some() {
            return Err(PaddockError::conflict(format!(
                "user {} already has an active {} vote",
                vote.user_id, vote.category
            )));
        }
        self.votes.push(vote.clone());
        Ok(())
    }

    pub fn delete_vote(&mut self, vote_id: &str) -> Option<Vote> {
        let position = self.votes.iter().position(|v| v.id == vote_id)?;
        Some(self.votes.remove(position))
    }

    pub fn insert_cancellation(&mut self, cancellation: &VoteCancellation) -> Result<()> {
        if self
            .find_cancellation(&cancellation.user_id, cancellation.category)
            .is_some()
        {
            return Err(PaddockError::conflict(format!(
                "user {} already cancelled a {} vote",
                cancellation.user_id, cancellation.category
            )));
        }
        self.cancellations.push(cancellation.clone());
        Ok(())
    }

    pub fn votes_in(&self, category: Category) -> Vec<Vote> {
        self.votes
            .iter()
            .filter(|v| v.category == category)
            .cloned()
            .collect()
    }

    pub fn votes_since(&self, since: DateTime<Utc>) -> Vec<Vote> {
        self.votes
            .iter()
            .filter(|v| v.created_at >= since)
            .cloned()
            .collect()
    }
}

impl TryFrom<LedgerDto> for LedgerRecords {
    type Error = PaddockError;

    fn try_from(dto: LedgerDto) -> Result<Self> {
        Ok(Self {
            votes: dto
                .votes
                .into_iter()
                .map(Vote::try_from)
                .collect::<Result<_>>()?,
            cancellations: dto.cancellations,
        })
    }
}

impl From<&LedgerRecords> for LedgerDto {
    fn from(records: &LedgerRecords) -> Self {
        Self {
            votes: records.votes.iter().map(VoteDto::from).collect(),
            cancellations: records.cancellations.clone(),
        }
    }
}
