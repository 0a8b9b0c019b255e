//! Operator-side heat lifecycle.
//!
//! Every mutation re-reads the active slot, applies one transition on the
//! domain model and writes the record back once. Notifications go out after
//! the write and never undo it.

use paddock_core::clock::Clock;
use paddock_core::error::{PaddockError, Result};
use paddock_core::notification::{
    Notification, NotificationDispatcher, NotificationKind, notify_or_log,
};
use paddock_core::session::{
    ClockView, ExpiryPolicy, Group, Session, SessionDuration, SessionRepository, SessionSnapshot,
    SessionStats, SessionStatus, clock_view,
};
use std::sync::Arc;

/// Use case for starting, pausing, resuming and completing heats.
pub struct SessionLifecycle {
    session_repository: Arc<dyn SessionRepository>,
    notifier: Arc<dyn NotificationDispatcher>,
    clock: Arc<dyn Clock>,
    expiry_policy: ExpiryPolicy,
}

impl SessionLifecycle {
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        notifier: Arc<dyn NotificationDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            session_repository,
            notifier,
            clock,
            expiry_policy: ExpiryPolicy::default(),
        }
    }

    pub fn with_expiry_policy(mut self, expiry_policy: ExpiryPolicy) -> Self {
        self.expiry_policy = expiry_policy;
        self
    }

    pub fn expiry_policy(&self) -> ExpiryPolicy {
        self.expiry_policy
    }

    /// Starts a heat for `group`.
    ///
    /// Fails with `Validation` while another heat is running or paused. The
    /// drivers of the next group in the rotation are told to get ready.
    pub async fn start(&self, group: Group, duration: SessionDuration) -> Result<Session> {
        if let Some(active) = self.session_repository.find_active().await? {
            return Err(PaddockError::validation(format!(
                "heat {} ({}) is still {}",
                active.id, active.group, active.status
            )));
        }

        let now = self.clock.now();
        let session = Session::start(group, duration, now);
        self.session_repository
            .save(&session)
            .await
            .map_err(|e| match e {
                PaddockError::Conflict(message) => PaddockError::Validation(message),
                other => other,
            })?;

        tracing::info!(
            "[SessionLifecycle] Started heat {} for {} ({} min)",
            session.id,
            group,
            duration.minutes()
        );

        let next = group.next();
        notify_or_log(
            self.notifier.as_ref(),
            Notification::broadcast(
                NotificationKind::SessionGroupUpcoming,
                format!("Heat {group} is on track. {next} group, get ready, you are up next!"),
                now,
            ),
        )
        .await;

        Ok(session)
    }

    pub async fn pause(&self) -> Result<Session> {
        let mut session = self.require_transition("pause").await?;
        session.pause(self.clock.now())?;
        self.session_repository.save(&session).await?;

        tracing::info!("[SessionLifecycle] Paused heat {}", session.id);
        Ok(session)
    }

    /// Resumes the paused heat, adding the pause to the accumulated total.
    pub async fn resume(&self) -> Result<Session> {
        let mut session = self.require_transition("resume").await?;
        let paused_ms = session.resume(self.clock.now())?;
        self.session_repository.save(&session).await?;

        tracing::info!(
            "[SessionLifecycle] Resumed heat {} after {} ms (total paused {} ms)",
            session.id,
            paused_ms,
            session.total_pause_duration_ms
        );
        Ok(session)
    }

    /// Completes the active heat, running or paused.
    pub async fn complete(&self) -> Result<Session> {
        let mut session = self.require_active().await?;
        session.complete(self.clock.now())?;
        self.session_repository.save(&session).await?;

        tracing::info!("[SessionLifecycle] Completed heat {}", session.id);
        Ok(session)
    }

    /// Applies the expiry policy to the active heat.
    ///
    /// Returns the completed session when the policy completed one.
    pub async fn enforce_expiry(&self) -> Result<Option<Session>> {
        if self.expiry_policy == ExpiryPolicy::Manual {
            return Ok(None);
        }

        let Some(mut session) = self.session_repository.find_active().await? else {
            return Ok(None);
        };
        let now = self.clock.now();
        if session.status != SessionStatus::Running || !clock_view(&session, now).is_expired() {
            return Ok(None);
        }

        session.complete(now)?;
        self.session_repository.save(&session).await?;
        tracing::info!(
            "[SessionLifecycle] Heat {} reached zero and was completed automatically",
            session.id
        );
        Ok(Some(session))
    }

    pub async fn active(&self) -> Result<Option<Session>> {
        self.session_repository.find_active().await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        self.session_repository.snapshot().await
    }

    /// Countdown for the active heat as of now.
    pub async fn clock(&self) -> Result<Option<ClockView>> {
        Ok(self
            .session_repository
            .find_active()
            .await?
            .map(|s| clock_view(&s, self.clock.now())))
    }

    /// Completed heats, most recent first.
    pub async fn history(&self, limit: usize) -> Result<Vec<Session>> {
        self.session_repository.list_completed(limit).await
    }

    pub async fn stats(&self, limit: usize) -> Result<Vec<SessionStats>> {
        Ok(self
            .history(limit)
            .await?
            .iter()
            .filter_map(SessionStats::from_session)
            .collect())
    }

    async fn require_active(&self) -> Result<Session> {
        self.session_repository
            .find_active()
            .await?
            .ok_or_else(|| PaddockError::not_found("Session", "active"))
    }

    /// Pause and resume with nothing on track are illegal transitions, not lookups.
    async fn require_transition(&self, action: &str) -> Result<Session> {
        self.session_repository
            .find_active()
            .await?
            .ok_or_else(|| PaddockError::validation(format!("no heat on track to {action}")))
    }
}
