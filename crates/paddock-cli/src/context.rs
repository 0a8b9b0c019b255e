//! Wires the file-backed stores into the application services.

use anyhow::{Context, Result};
use paddock_application::{
    BallotService, BroadcastService, PollingSynchronizer, SessionLifecycle, VoteSummaryService,
};
use paddock_core::clock::{Clock, SystemClock};
use paddock_core::config::PaddockConfig;
use paddock_core::notification::NotificationDispatcher;
use paddock_infrastructure::{
    ConfigService, PaddockPaths, TomlBallotLedger, TomlNotificationInbox, TomlRosterRepository,
    TomlSessionRepository, TomlSettingsRepository, TracingNotifier,
};
use std::path::PathBuf;
use std::sync::Arc;

pub struct AppContext {
    pub config: PaddockConfig,
    pub paths: PaddockPaths,
    pub inbox: Arc<TomlNotificationInbox>,
    sessions: Arc<TomlSessionRepository>,
    lifecycle: Arc<SessionLifecycle>,
    ballot: Arc<BallotService>,
    summaries: VoteSummaryService,
    broadcasts: BroadcastService,
    clock: Arc<dyn Clock>,
}

impl AppContext {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config_service =
            ConfigService::new(config_path).context("Failed to locate config file")?;
        let config = config_service
            .get_config()
            .context("Failed to load configuration")?;
        let paths = config_service
            .paths()
            .context("Failed to resolve data directory")?;
        Ok(Self::from_parts(config, paths))
    }

    fn from_parts(config: PaddockConfig, paths: PaddockPaths) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let inbox = Arc::new(TomlNotificationInbox::new(&paths));
        let notifier: Arc<dyn NotificationDispatcher> = inbox.clone();
        let sessions = Arc::new(TomlSessionRepository::new(&paths));
        let ledger = Arc::new(TomlBallotLedger::new(&paths));
        let roster = Arc::new(TomlRosterRepository::new(&paths));
        let settings = Arc::new(TomlSettingsRepository::new(&paths));

        let lifecycle = Arc::new(
            SessionLifecycle::new(sessions.clone(), notifier.clone(), clock.clone())
                .with_expiry_policy(config.session.expiry_policy),
        );
        let ballot = Arc::new(BallotService::new(
            ledger.clone(),
            roster.clone(),
            settings,
            notifier.clone(),
            clock.clone(),
        ));
        let summaries = VoteSummaryService::new(ledger, roster, notifier.clone(), clock.clone());
        let broadcasts = BroadcastService::new(notifier, clock.clone());

        Self {
            config,
            paths,
            inbox,
            sessions,
            lifecycle,
            ballot,
            summaries,
            broadcasts,
            clock,
        }
    }

    pub fn lifecycle(&self) -> &SessionLifecycle {
        &self.lifecycle
    }

    pub fn ballot(&self) -> &BallotService {
        &self.ballot
    }

    pub fn summaries(&self) -> &VoteSummaryService {
        &self.summaries
    }

    pub fn broadcasts(&self) -> &BroadcastService {
        &self.broadcasts
    }

    /// Builds a dashboard loop that also applies the configured expiry policy.
    ///
    /// Its last-minute alert goes to this process's log, not the shared inbox.
    pub fn synchronizer(&self, user_id: Option<String>) -> PollingSynchronizer {
        let synchronizer = PollingSynchronizer::new(
            self.sessions.clone(),
            self.ballot.clone(),
            Arc::new(TracingNotifier),
            self.clock.clone(),
            self.config.polling.clone(),
        )
        .with_expiry_enforcement(self.lifecycle.clone());
        match user_id {
            Some(user_id) => synchronizer.with_user(user_id),
            None => synchronizer,
        }
    }
}
