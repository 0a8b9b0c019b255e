//! In-memory repository implementations.
//!
//! Same constraint rules as the TOML stores, minus durability. Used by tests
//! and by embedders that keep state in process.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use paddock_core::ballot::{BallotLedger, Category, Vote, VoteCancellation};
use paddock_core::error::Result;
use paddock_core::notification::{Notification, NotificationDispatcher};
use paddock_core::roster::{Car, RosterRepository, Voter};
use paddock_core::session::{Session, SessionRepository, SessionSnapshot};
use paddock_core::settings::{AppSettings, SettingsRepository};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::records::{LedgerRecords, SessionSlots};

#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    slots: Arc<RwLock<SessionSlots>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_active(&self) -> Result<Option<Session>> {
        Ok(self.slots.read().await.active.clone())
    }

    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        Ok(self.slots.read().await.find_by_id(session_id).cloned())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        self.slots.write().await.apply_save(session)
    }

    async fn list_completed(&self, limit: usize) -> Result<Vec<Session>> {
        Ok(self.slots.read().await.completed_newest_first(limit))
    }

    async fn snapshot(&self) -> Result<SessionSnapshot> {
        let slots = self.slots.read().await;
        Ok(SessionSnapshot {
            active: slots.active.clone(),
            last_completed: slots.history.last().cloned(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryBallotLedger {
    records: Arc<RwLock<LedgerRecords>>,
}

impl InMemoryBallotLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cancellation markers across all users and categories.
    pub async fn cancellation_count(&self) -> usize {
        self.records.read().await.cancellations.len()
    }
}

#[async_trait]
impl BallotLedger for InMemoryBallotLedger {
    async fn find_vote(&self, user_id: &str, category: Category) -> Result<Option<Vote>> {
        Ok(self.records.read().await.find_vote(user_id, category).cloned())
    }

    async fn find_cancellation(
        &self,
        user_id: &str,
        category: Category,
    ) -> Result<Option<VoteCancellation>> {
        Ok(self
            .records
            .read()
            .await
            .find_cancellation(user_id, category)
            .cloned())
    }

    async fn insert_vote(&self, vote: &Vote) -> Result<()> {
        self.records.write().await.insert_vote(vote)
    }

    async fn delete_vote(&self, vote_id: &str) -> Result<Option<Vote>> {
        Ok(self.records.write().await.delete_vote(vote_id))
    }

    async fn insert_cancellation(&self, cancellation: &VoteCancellation) -> Result<()> {
        self.records.write().await.insert_cancellation(cancellation)
    }

    async fn list_votes(&self, category: Category) -> Result<Vec<Vote>> {
        Ok(self.records.read().await.votes_in(category))
    }

    async fn list_votes_since(&self, since: DateTime<Utc>) -> Result<Vec<Vote>> {
        Ok(self.records.read().await.votes_since(since))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySettingsRepository {
    settings: Arc<RwLock<AppSettings>>,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn get_settings(&self) -> Result<AppSettings> {
        Ok(self.settings.read().await.clone())
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        *self.settings.write().await = settings.clone();
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryRosterRepository {
    voters: Arc<RwLock<Vec<Voter>>>,
    cars: Arc<RwLock<Vec<Car>>>,
}

impl InMemoryRosterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a voter with the same id.
    pub async fn upsert_voter(&self, voter: Voter) {
        let mut voters = self.voters.write().await;
        voters.retain(|v| v.id != voter.id);
        voters.push(voter);
    }

    /// Adds or replaces a car with the same id.
    pub async fn upsert_car(&self, car: Car) {
        let mut cars = self.cars.write().await;
        cars.retain(|c| c.id != car.id);
        cars.push(car);
    }
}

#[async_trait]
impl RosterRepository for InMemoryRosterRepository {
    async fn find_voter(&self, voter_id: &str) -> Result<Option<Voter>> {
        Ok(self
            .voters
            .read()
            .await
            .iter()
            .find(|v| v.id == voter_id)
            .cloned())
    }

    async fn find_car(&self, car_id: &str) -> Result<Option<Car>> {
        Ok(self.cars.read().await.iter().find(|c| c.id == car_id).cloned())
    }

    async fn list_cars(&self, category: Category) -> Result<Vec<Car>> {
        Ok(self
            .cars
            .read()
            .await
            .iter()
            .filter(|c| c.category == category)
            .cloned()
            .collect())
    }
}

/// Keeps every dispatched notification for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<RwLock<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingNotifier {
    async fn notify(&self, notification: Notification) -> Result<()> {
        self.sent.write().await.push(notification);
        Ok(())
    }
}
