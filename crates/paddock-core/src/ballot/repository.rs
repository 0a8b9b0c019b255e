//! Ballot ledger trait.

use super::model::{Category, Vote, VoteCancellation};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable record of votes and cancellations.
///
/// # Implementation Notes
///
/// Two uniqueness constraints must hold per `(user_id, category)` and be
/// reported as `PaddockError::Conflict` on insert:
/// - at most one active vote
/// - at most one cancellation, ever
///
/// Each method is a single atomic read or write; the ledger does not offer
/// multi-step transactions.
#[async_trait]
pub trait BallotLedger: Send + Sync {
    /// Returns the active vote for a user in a category.
    async fn find_vote(&self, user_id: &str, category: Category) -> Result<Option<Vote>>;

    /// Returns the cancellation marker for a user in a category.
    async fn find_cancellation(
        &self,
        user_id: &str,
        category: Category,
    ) -> Result<Option<VoteCancellation>>;

    /// Inserts a vote, failing with `Conflict` if one is already active.
    async fn insert_vote(&self, vote: &Vote) -> Result<()>;

    /// Removes the vote with this id, returning it if it was still active.
    async fn delete_vote(&self, vote_id: &str) -> Result<Option<Vote>>;

    /// Inserts a cancellation marker, failing with `Conflict` on a duplicate.
    async fn insert_cancellation(&self, cancellation: &VoteCancellation) -> Result<()>;

    /// Lists active votes in a category.
    async fn list_votes(&self, category: Category) -> Result<Vec<Vote>>;

    /// Lists active votes in any category created at or after `since`.
    async fn list_votes_since(&self, since: DateTime<Utc>) -> Result<Vec<Vote>>;
}
