//! Roster of voters and cars.

mod model;
mod repository;

pub use model::{Car, Role, Voter};
pub use repository::RosterRepository;
