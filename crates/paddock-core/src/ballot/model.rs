//! Ballot domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{PaddockError, Result};

/// Competition discipline a ballot belongs to.
///
/// Each category keeps fully independent ballot state; the global daily mode
/// only decides which one is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Drift,
    TimeAttack,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Drift => "drift",
            Category::TimeAttack => "time_attack",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = PaddockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "drift" => Ok(Category::Drift),
            "time_attack" | "timeattack" => Ok(Category::TimeAttack),
            other => Err(PaddockError::validation(format!(
                "unknown category '{other}'"
            ))),
        }
    }
}

/// How much one cast counts, configured per voter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct VoteWeight(u8);

impl VoteWeight {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for VoteWeight {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for VoteWeight {
    type Error = PaddockError;

    fn try_from(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PaddockError::validation(format!(
                "vote weight must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }
}

impl From<VoteWeight> for u8 {
    fn from(weight: VoteWeight) -> Self {
        weight.0
    }
}

/// A user's active vote in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: String,
    pub user_id: String,
    pub car_id: String,
    pub category: Category,
    /// Copied from the voter at cast time; later weight changes do not apply
    pub vote_weight: VoteWeight,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(
        user_id: impl Into<String>,
        car_id: impl Into<String>,
        category: Category,
        vote_weight: VoteWeight,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            car_id: car_id.into(),
            category,
            vote_weight,
            created_at: now,
        }
    }
}

/// Permanent marker that a user spent their one cancellation in a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCancellation {
    pub id: String,
    pub user_id: String,
    pub category: Category,
    /// The vote this cancellation removed, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl VoteCancellation {
    pub fn new(user_id: impl Into<String>, category: Category, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            category,
            vote_id: None,
            created_at: now,
        }
    }

    /// Creates the marker for cancelling `vote`.
    pub fn for_vote(vote: &Vote, now: DateTime<Utc>) -> Self {
        Self {
            vote_id: Some(vote.id.clone()),
            ..Self::new(vote.user_id.clone(), vote.category, now)
        }
    }

    pub fn cancels(&self, vote: &Vote) -> bool {
        self.vote_id.as_deref() == Some(vote.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_weight_bounds() {
        assert!(VoteWeight::try_from(0).unwrap_err().is_validation());
        assert_eq!(VoteWeight::try_from(1).unwrap().get(), 1);
        assert_eq!(VoteWeight::try_from(10).unwrap().get(), 10);
        assert!(VoteWeight::try_from(11).is_err());
        assert_eq!(VoteWeight::default().get(), 1);
    }

    #[test]
    fn test_category_parse_and_display() {
        assert_eq!("time-attack".parse::<Category>().unwrap(), Category::TimeAttack);
        assert_eq!("DRIFT".parse::<Category>().unwrap(), Category::Drift);
        assert!("rally".parse::<Category>().is_err());
        assert_eq!(Category::TimeAttack.to_string(), "time_attack");
    }
}
