//! Ballot rules against the file-backed stores.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use paddock_application::BallotService;
use paddock_core::ballot::{BallotLedger, BallotStage, Category, Vote, VoteCancellation};
use paddock_core::clock::SystemClock;
use paddock_core::error::Result;
use paddock_core::roster::{Car, Role, Voter};
use paddock_infrastructure::dto::RosterDto;
use paddock_infrastructure::storage::AtomicTomlFile;
use paddock_infrastructure::{
    PaddockPaths, RecordingNotifier, StoreFile, TomlBallotLedger, TomlRosterRepository,
    TomlSettingsRepository,
};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Barrier;

/// Holds every cancellation insert until two callers have reached it.
struct GatedLedger {
    inner: TomlBallotLedger,
    gate: Barrier,
}

#[async_trait]
impl BallotLedger for GatedLedger {
    async fn find_vote(&self, user_id: &str, category: Category) -> Result<Option<Vote>> {
        self.inner.find_vote(user_id, category).await
    }

    async fn find_cancellation(
        &self,
        user_id: &str,
        category: Category,
    ) -> Result<Option<VoteCancellation>> {
        self.inner.find_cancellation(user_id, category).await
    }

    async fn insert_vote(&self, vote: &Vote) -> Result<()> {
        self.inner.insert_vote(vote).await
    }

    async fn delete_vote(&self, vote_id: &str) -> Result<Option<Vote>> {
        self.inner.delete_vote(vote_id).await
    }

    async fn insert_cancellation(&self, cancellation: &VoteCancellation) -> Result<()> {
        self.gate.wait().await;
        self.inner.insert_cancellation(cancellation).await
    }

    async fn list_votes(&self, category: Category) -> Result<Vec<Vote>> {
        self.inner.list_votes(category).await
    }

    async fn list_votes_since(&self, since: DateTime<Utc>) -> Result<Vec<Vote>> {
        self.inner.list_votes_since(since).await
    }
}

fn write_roster(paths: &PaddockPaths) {
    let voter = |id: &str, name: &str, role: Role| Voter {
        id: id.to_string(),
        name: name.to_string(),
        role,
        vote_weight: Default::default(),
    };
    let car = |id: &str, owner: &str| Car {
        id: id.to_string(),
        owner_id: owner.to_string(),
        category: Category::Drift,
        brand: "Nissan".to_string(),
        model: "180SX".to_string(),
        registration_number: format!("REG-{id}"),
    };
    let roster = RosterDto {
        voters: vec![
            voter("kei", "Kei", Role::Driver),
            voter("mika", "Mika", Role::Spectator),
        ],
        cars: vec![car("car-1", "kei"), car("car-2", "kei")],
    };
    AtomicTomlFile::new(paths.store_file(StoreFile::Roster))
        .save(&roster)
        .unwrap();
}

fn service(paths: &PaddockPaths) -> (BallotService, TomlBallotLedger) {
    let ledger = TomlBallotLedger::new(paths);
    let service = BallotService::new(
        Arc::new(ledger.clone()),
        Arc::new(TomlRosterRepository::new(paths)),
        Arc::new(TomlSettingsRepository::new(paths)),
        Arc::new(RecordingNotifier::new()),
        Arc::new(SystemClock),
    );
    (service, ledger)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_double_cancel_records_one_cancellation() {
    let temp_dir = TempDir::new().unwrap();
    let paths = PaddockPaths::new(Some(temp_dir.path())).unwrap();
    write_roster(&paths);
    let ledger = Arc::new(GatedLedger {
        inner: TomlBallotLedger::new(&paths),
        gate: Barrier::new(2),
    });
    let service = Arc::new(BallotService::new(
        ledger.clone(),
        Arc::new(TomlRosterRepository::new(&paths)),
        Arc::new(TomlSettingsRepository::new(&paths)),
        Arc::new(RecordingNotifier::new()),
        Arc::new(SystemClock),
    ));

    service.vote("mika", "car-1", Category::Drift).await.unwrap();

    let cancel = |service: Arc<BallotService>| {
        tokio::spawn(async move { service.cancel_vote("mika", Category::Drift).await })
    };
    let a = cancel(Arc::clone(&service));
    let b = cancel(Arc::clone(&service));
    let (a, b) = (a.await.unwrap(), b.await.unwrap());
    assert!(a.is_ok(), "{a:?}");
    assert!(b.is_ok(), "{b:?}");

    let marker = ledger
        .find_cancellation("mika", Category::Drift)
        .await
        .unwrap()
        .unwrap();
    assert!(marker.vote_id.is_some());
    assert!(ledger.find_vote("mika", Category::Drift).await.unwrap().is_none());

    let e = service.eligibility("mika", Category::Drift).await.unwrap();
    assert_eq!(e.stage, BallotStage::Reopened);
}

#[tokio::test]
async fn at_most_two_casts_per_category() {
    let temp_dir = TempDir::new().unwrap();
    let paths = PaddockPaths::new(Some(temp_dir.path())).unwrap();
    write_roster(&paths);
    let (service, ledger) = service(&paths);

    service.vote("mika", "car-1", Category::Drift).await.unwrap();
    assert!(service
        .vote("mika", "car-2", Category::Drift)
        .await
        .unwrap_err()
        .is_already_voted());

    service.cancel_vote("mika", Category::Drift).await.unwrap();
    service.vote("mika", "car-2", Category::Drift).await.unwrap();

    assert!(service
        .cancel_vote("mika", Category::Drift)
        .await
        .unwrap_err()
        .is_cancel_not_allowed());
    assert!(service
        .vote("mika", "car-1", Category::Drift)
        .await
        .unwrap_err()
        .is_already_voted());

    let votes = ledger.list_votes(Category::Drift).await.unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].car_id, "car-2");
    assert!(votes[0].created_at <= Utc::now());
}

#[tokio::test]
async fn owner_cannot_vote_for_own_car() {
    let temp_dir = TempDir::new().unwrap();
    let paths = PaddockPaths::new(Some(temp_dir.path())).unwrap();
    write_roster(&paths);
    let (service, ledger) = service(&paths);

    for car in ["car-1", "car-2"] {
        let err = service.vote("kei", car, Category::Drift).await.unwrap_err();
        assert!(err.is_self_vote());
    }
    assert!(ledger.list_votes(Category::Drift).await.unwrap().is_empty());
}

#[tokio::test]
async fn flipping_daily_mode_keeps_votes() {
    let temp_dir = TempDir::new().unwrap();
    let paths = PaddockPaths::new(Some(temp_dir.path())).unwrap();
    write_roster(&paths);
    let (service, ledger) = service(&paths);

    service.vote_live("mika", "car-1").await.unwrap();
    service.set_daily_mode(Category::TimeAttack).await.unwrap();
    service.set_daily_mode(Category::Drift).await.unwrap();

    assert_eq!(ledger.list_votes(Category::Drift).await.unwrap().len(), 1);
}
