//! Domain layer for Paddock.
//!
//! Holds the entities, the pure derivations (session countdown, ballot
//! eligibility) and the repository and collaborator traits that the
//! infrastructure layer implements.

pub mod ballot;
pub mod clock;
pub mod config;
pub mod error;
pub mod notification;
pub mod roster;
pub mod session;
pub mod settings;

// Re-export common error type
pub use error::PaddockError;
