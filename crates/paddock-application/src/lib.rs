//! Application layer for Paddock.
//!
//! Use cases that coordinate the domain rules in `paddock-core` with whatever
//! repositories, notifier and clock the caller wires in.

pub mod ballot_service;
pub mod broadcast_service;
pub mod session_lifecycle;
pub mod sync;
pub mod vote_summary_service;

pub use ballot_service::BallotService;
pub use broadcast_service::BroadcastService;
pub use session_lifecycle::SessionLifecycle;
pub use sync::{PollingSynchronizer, Reconciliation, SyncView};
pub use vote_summary_service::{CarTally, Standing, VoteSummaryService};
