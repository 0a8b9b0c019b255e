//! Roster repository trait.

use async_trait::async_trait;

use super::model::{Car, Voter};
use crate::ballot::Category;
use crate::error::Result;

/// Read access to registered voters and entered cars.
///
/// The roster is maintained outside the core (registration, admin screens).
#[async_trait]
pub trait RosterRepository: Send + Sync {
    async fn find_voter(&self, voter_id: &str) -> Result<Option<Voter>>;

    async fn find_car(&self, car_id: &str) -> Result<Option<Car>>;

    async fn list_cars(&self, category: Category) -> Result<Vec<Car>>;
}
