pub mod broadcast;
pub mod inbox;
pub mod mode;
pub mod session;
pub mod summary;
pub mod vote;
pub mod watch;
