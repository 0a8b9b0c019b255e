//! The polling loop a dashboard runs.
//!
//! Three cadences share one task: session snapshots, dashboard data (daily
//! mode and the user's eligibility), and a local clock tick that recomputes
//! the countdown from the held snapshot without touching storage.

use chrono::{DateTime, Duration, Utc};
use paddock_core::ballot::{Category, Eligibility};
use paddock_core::clock::Clock;
use paddock_core::config::PollingConfig;
use paddock_core::notification::{
    Notification, NotificationDispatcher, NotificationKind, notify_or_log,
};
use paddock_core::session::{ClockView, PhaseTracker, Session, SessionRepository, clock_view};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

use super::reconcile::{Reconciliation, reconcile};
use crate::ballot_service::BallotService;
use crate::session_lifecycle::SessionLifecycle;

/// How long a completion announcement stays on screen.
const ANNOUNCEMENT_TTL_SECS: i64 = 10;

/// Everything a dashboard renders, as of the last poll or tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncView {
    pub session: Option<Session>,
    pub clock: Option<ClockView>,
    pub daily_mode: Option<Category>,
    pub eligibility: Option<Eligibility>,
    pub announcement: Option<String>,
    /// The last session poll failed; `session` is the prior snapshot
    pub session_stale: bool,
    /// The last dashboard poll failed; mode and eligibility are the prior values
    pub dashboard_stale: bool,
}

pub struct PollingSynchronizer {
    session_repository: Arc<dyn SessionRepository>,
    ballot: Arc<BallotService>,
    /// Local to this client; never the shared inbox other clients read
    alerts: Arc<dyn NotificationDispatcher>,
    clock: Arc<dyn Clock>,
    polling: PollingConfig,
    user_id: Option<String>,
    lifecycle: Option<Arc<SessionLifecycle>>,
    tracker: PhaseTracker,
    announced_at: Option<DateTime<Utc>>,
    view: SyncView,
    publisher: watch::Sender<SyncView>,
}

impl PollingSynchronizer {
    /// Creates a dashboard loop.
    ///
    /// `alerts` receives this client's one-shot last-minute alert. Every
    /// dashboard raises its own, so it must be a dispatcher local to the
    /// client (a log, a desktop notification) rather than a shared inbox.
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        ballot: Arc<BallotService>,
        alerts: Arc<dyn NotificationDispatcher>,
        clock: Arc<dyn Clock>,
        polling: PollingConfig,
    ) -> Self {
        let (publisher, _) = watch::channel(SyncView::default());
        Self {
            session_repository,
            ballot,
            alerts,
            clock,
            polling,
            user_id: None,
            lifecycle: None,
            tracker: PhaseTracker::new(),
            announced_at: None,
            view: SyncView::default(),
            publisher,
        }
    }

    /// Follows this user's ballot eligibility on dashboard polls.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Runs the lifecycle's expiry policy before every session poll.
    pub fn with_expiry_enforcement(mut self, lifecycle: Arc<SessionLifecycle>) -> Self {
        self.lifecycle = Some(lifecycle);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncView> {
        self.publisher.subscribe()
    }

    pub fn view(&self) -> &SyncView {
        &self.view
    }

    /// Fetches the session snapshot and reconciles it with the held one.
    ///
    /// Returns `None` when the fetch failed; the prior snapshot stays in
    /// effect and the view is marked stale.
    pub async fn poll_session(&mut self) -> Option<Reconciliation> {
        if let Some(lifecycle) = &self.lifecycle {
            if let Err(e) = lifecycle.enforce_expiry().await {
                tracing::warn!(target: "paddock::sync", "Expiry check failed: {}", e);
            }
        }

        let snapshot = match self.session_repository.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(target: "paddock::sync", "Session poll failed, keeping prior snapshot: {}", e);
                self.view.session_stale = true;
                self.publish();
                return None;
            }
        };

        let (held, outcome) = reconcile(self.view.session.as_ref(), &snapshot);
        self.view.session_stale = false;
        match &outcome {
            Reconciliation::Adopted => {
                tracing::debug!(target: "paddock::sync", "Holding session {:?}", held.as_ref().map(|s| &s.id));
                self.view.announcement = None;
                self.announced_at = None;
                self.view.session = held;
            }
            Reconciliation::Updated => self.view.session = held,
            Reconciliation::Cleared => {
                self.view.session = None;
                self.view.clock = None;
            }
            Reconciliation::Completed { announcement } => {
                tracing::info!(target: "paddock::sync", "{}", announcement);
                self.view.session = None;
                self.view.clock = None;
                self.view.announcement = Some(announcement.clone());
                self.announced_at = Some(self.clock.now());
            }
            Reconciliation::Outdated => {
                tracing::debug!(target: "paddock::sync", "Ignoring out-of-order session response");
            }
            Reconciliation::Unchanged => {}
        }

        if !matches!(outcome, Reconciliation::Unchanged | Reconciliation::Outdated) {
            self.refresh_clock().await;
        }
        self.publish();
        Some(outcome)
    }

    /// Fetches the daily mode and, when following a user, their eligibility.
    ///
    /// Returns `false` when the fetch failed and the prior values were kept.
    pub async fn poll_dashboard(&mut self) -> bool {
        let result = async {
            let category = self.ballot.daily_mode().await?;
            let eligibility = match &self.user_id {
                Some(user_id) => Some(self.ballot.eligibility(user_id, category).await?),
                None => None,
            };
            Ok::<_, paddock_core::PaddockError>((category, eligibility))
        }
        .await;

        let ok = match result {
            Ok((category, eligibility)) => {
                self.view.daily_mode = Some(category);
                self.view.eligibility = eligibility;
                self.view.dashboard_stale = false;
                true
            }
            Err(e) => {
                tracing::warn!(target: "paddock::sync", "Dashboard poll failed, keeping prior data: {}", e);
                self.view.dashboard_stale = true;
                false
            }
        };
        self.publish();
        ok
    }

    /// Recomputes the countdown from the held snapshot.
    pub async fn tick(&mut self) -> Option<ClockView> {
        if let Some(at) = self.announced_at {
            if self.clock.now() - at >= Duration::seconds(ANNOUNCEMENT_TTL_SECS) {
                self.view.announcement = None;
                self.announced_at = None;
            }
        }
        self.refresh_clock().await;
        self.publish();
        self.view.clock.clone()
    }

    /// Drives all three cadences until `cancel` fires.
    pub async fn run(&mut self, cancel: CancellationToken) {
        let mut session_ticker = interval(self.polling.session_interval());
        let mut dashboard_ticker = interval(self.polling.dashboard_interval());
        let mut clock_ticker = interval(self.polling.tick_interval());
        for ticker in [&mut session_ticker, &mut dashboard_ticker, &mut clock_ticker] {
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        }

        tracing::info!(
            target: "paddock::sync",
            "Polling started (session {:?}, dashboard {:?}, tick {:?})",
            self.polling.session_interval(),
            self.polling.dashboard_interval(),
            self.polling.tick_interval()
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = session_ticker.tick() => {
                    self.poll_session().await;
                }
                _ = dashboard_ticker.tick() => {
                    self.poll_dashboard().await;
                }
                _ = clock_ticker.tick() => {
                    self.tick().await;
                }
            }
        }

        tracing::info!(target: "paddock::sync", "Polling stopped");
    }

    async fn refresh_clock(&mut self) {
        let Some(session) = &self.view.session else {
            self.view.clock = None;
            return;
        };
        let view = clock_view(session, self.clock.now());
        if self.tracker.observe(&view) {
            notify_or_log(
                self.alerts.as_ref(),
                Notification::broadcast(
                    NotificationKind::SessionLastMinute,
                    format!("Last minute of heat {}!", session.group),
                    self.clock.now(),
                ),
            )
            .await;
        }
        self.view.clock = Some(view);
    }

    fn publish(&self) {
        self.publisher.send_replace(self.view.clone());
    }
}
