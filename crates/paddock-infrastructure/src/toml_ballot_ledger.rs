//! TOML-based BallotLedger implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use paddock_core::ballot::{BallotLedger, Category, Vote, VoteCancellation};
use paddock_core::error::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::dto::LedgerDto;
use crate::paths::{PaddockPaths, StoreFile};
use crate::records::LedgerRecords;
use crate::storage::{AtomicTomlFile, run_blocking};

/// Stores votes and cancellation markers in `ballots.toml`.
///
/// The uniqueness checks run inside the file lock, so two processes racing
/// on the same `(user, category)` see exactly one insert succeed.
#[derive(Debug, Clone)]
pub struct TomlBallotLedger {
    file: Arc<AtomicTomlFile<LedgerDto>>,
}

impl TomlBallotLedger {
    pub fn new(paths: &PaddockPaths) -> Self {
        Self::with_path(paths.store_file(StoreFile::Ballots))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }

    async fn read<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&LedgerRecords) -> R + Send + 'static,
        R: Send + 'static,
    {
        let file = Arc::clone(&self.file);
        run_blocking(move || {
            let records = LedgerRecords::try_from(file.load()?.unwrap_or_default())?;
            Ok(f(&records))
        })
        .await
    }

    async fn write<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut LedgerRecords) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let file = Arc::clone(&self.file);
        run_blocking(move || {
            file.update(|dto: &mut LedgerDto| {
                let mut records = LedgerRecords::try_from(std::mem::take(dto))?;
                let result = f(&mut records)?;
                *dto = LedgerDto::from(&records);
                Ok(result)
            })
        })
        .await
    }
}

#[async_trait]
impl BallotLedger for TomlBallotLedger {
    async fn find_vote(&self, user_id: &str, category: Category) -> Result<Option<Vote>> {
        let user_id = user_id.to_string();
        self.read(move |r| r.find_vote(&user_id, category).cloned())
            .await
    }

    async fn find_cancellation(
        &self,
        user_id: &str,
        category: Category,
    ) -> Result<Option<VoteCancellation>> {
        let user_id = user_id.to_string();
        self.read(move |r| r.find_cancellation(&user_id, category).cloned())
            .await
    }

    async fn insert_vote(&self, vote: &Vote) -> Result<()> {
        let vote = vote.clone();
        self.write(move |r| r.insert_vote(&vote)).await
    }

    async fn delete_vote(&self, vote_id: &str) -> Result<Option<Vote>> {
        let vote_id = vote_id.to_string();
        self.write(move |r| Ok(r.delete_vote(&vote_id)))
            .await
    }

    async fn insert_cancellation(&self, cancellation: &VoteCancellation) -> Result<()> {
        let cancellation = cancellation.clone();
        self.write(move |r| r.insert_cancellation(&cancellation))
            .await
    }

    async fn list_votes(&self, category: Category) -> Result<Vec<Vote>> {
        self.read(move |r| r.votes_in(category)).await
    }

    async fn list_votes_since(&self, since: DateTime<Utc>) -> Result<Vec<Vote>> {
        self.read(move |r| r.votes_since(since)).await
    }
}
