//! Data transfer objects for the TOML store files.
//!
//! Domain types never touch the file format directly; each store file has
//! a DTO describing its layout and the lenient parsing rules for old data.

mod ballot;
mod session;

pub use ballot::{LedgerDto, VoteDto};
pub use session::{SessionDto, SessionStoreDto};

use paddock_core::notification::Notification;
use paddock_core::roster::{Car, Voter};
use serde::{Deserialize, Serialize};

/// Whole-file layout of `roster.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterDto {
    #[serde(default, rename = "voter", skip_serializing_if = "Vec::is_empty")]
    pub voters: Vec<Voter>,
    #[serde(default, rename = "car", skip_serializing_if = "Vec::is_empty")]
    pub cars: Vec<Car>,
}

/// Whole-file layout of `notifications.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboxDto {
    #[serde(default, rename = "notification", skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<Notification>,
}
