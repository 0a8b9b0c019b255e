//! Notification domain module.

mod dispatcher;
mod model;

pub use dispatcher::{NotificationDispatcher, notify_or_log};
pub use model::{Notification, NotificationKind};
