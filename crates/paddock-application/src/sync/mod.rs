//! Client-side polling: periodic snapshot fetches plus a local countdown.

mod reconcile;
mod synchronizer;

pub use reconcile::{Reconciliation, completion_announcement, reconcile};
pub use synchronizer::{PollingSynchronizer, SyncView};
