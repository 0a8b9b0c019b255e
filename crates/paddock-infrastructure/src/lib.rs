pub mod config_service;
pub mod dto;
pub mod memory;
pub mod paths;
pub mod storage;
pub mod toml_ballot_ledger;
pub mod toml_notification_inbox;
pub mod toml_roster_repository;
pub mod toml_session_repository;
pub mod toml_settings_repository;
pub mod tracing_notifier;

mod records;

pub use crate::config_service::ConfigService;
pub use crate::memory::{
    InMemoryBallotLedger, InMemoryRosterRepository, InMemorySessionRepository,
    InMemorySettingsRepository, RecordingNotifier,
};
pub use crate::paths::{PaddockPaths, StoreFile};
pub use crate::toml_ballot_ledger::TomlBallotLedger;
pub use crate::toml_notification_inbox::TomlNotificationInbox;
pub use crate::toml_roster_repository::TomlRosterRepository;
pub use crate::toml_session_repository::TomlSessionRepository;
pub use crate::toml_settings_repository::TomlSettingsRepository;
pub use crate::tracing_notifier::TracingNotifier;
