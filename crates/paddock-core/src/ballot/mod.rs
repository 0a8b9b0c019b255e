//! Ballot domain module.
//!
//! # Module Structure
//!
//! - `model`: `Category`, `VoteWeight`, `Vote`, `VoteCancellation`
//! - `eligibility`: the pure vote/cancel state machine
//! - `repository`: `BallotLedger` persistence interface

mod eligibility;
mod model;
mod repository;

pub use eligibility::{BallotStage, Eligibility};
pub use model::{Category, Vote, VoteCancellation, VoteWeight};
pub use repository::BallotLedger;
