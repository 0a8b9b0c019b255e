//! Roster domain models: who votes and what they vote for.

use serde::{Deserialize, Serialize};

use crate::ballot::{Category, VoteWeight};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Driver,
    #[default]
    Spectator,
    Admin,
}

/// A registered user able to cast ballots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    /// Copied onto each vote at cast time
    #[serde(default)]
    pub vote_weight: VoteWeight,
}

impl Voter {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A competing car entered in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    pub id: String,
    /// The driver who entered the car
    pub owner_id: String,
    pub category: Category,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub registration_number: String,
}

impl Car {
    /// Human-readable label, e.g. `Nissan Silvia (KR 1234)`.
    pub fn label(&self) -> String {
        if self.registration_number.is_empty() {
            format!("{} {}", self.brand, self.model)
        } else {
            format!("{} {} ({})", self.brand, self.model, self.registration_number)
        }
    }
}
