//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: the `Session` entity, `Group` rotation, durations and expiry policy
//! - `clock`: pure countdown derivation (`clock_view`) and the last-minute latch
//! - `stats`: summaries of completed heats
//! - `repository`: persistence interface for the active slot and history

mod clock;
mod model;
mod repository;
mod stats;

pub use clock::{ClockView, LAST_MINUTE_MS, Phase, PhaseTracker, clock_view, format_countdown};
pub use model::{
    DEFAULT_DURATION_MINUTES, ExpiryPolicy, Group, Session, SessionDuration, SessionStatus,
};
pub use repository::{SessionRepository, SessionSnapshot};
pub use stats::{SessionStats, format_minutes_seconds};
