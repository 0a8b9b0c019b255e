//! Persisted form of the ballot ledger.

use chrono::{DateTime, Utc};
use paddock_core::ballot::{Category, Vote, VoteCancellation, VoteWeight};
use paddock_core::error::{PaddockError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteDto {
    pub id: String,
    pub user_id: String,
    pub car_id: String,
    pub category: Category,
    /// Records written before weights existed count once
    #[serde(default = "default_weight")]
    pub vote_weight: u8,
    pub created_at: DateTime<Utc>,
}

fn default_weight() -> u8 {
    VoteWeight::MIN
}

impl From<&Vote> for VoteDto {
    fn from(vote: &Vote) -> Self {
        Self {
            id: vote.id.clone(),
            user_id: vote.user_id.clone(),
            car_id: vote.car_id.clone(),
            category: vote.category,
            vote_weight: vote.vote_weight.get(),
            created_at: vote.created_at,
        }
    }
}

impl TryFrom<VoteDto> for Vote {
    type Error = PaddockError;

    fn try_from(dto: VoteDto) -> Result<Self> {
        Ok(Vote {
            vote_weight: VoteWeight::try_from(dto.vote_weight)?,
            id: dto.id,
            user_id: dto.user_id,
            car_id: dto.car_id,
            category: dto.category,
            created_at: dto.created_at,
        })
    }
}

/// Whole-file layout of `ballots.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerDto {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub votes: Vec<VoteDto>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cancellations: Vec<VoteCancellation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_weight_counts_once() {
        let doc = r#"
[[votes]]
id = "v-1"
user_id = "u-1"
car_id = "c-1"
category = "drift"
created_at = "2024-06-01T10:00:00Z"
"#;
        let ledger: LedgerDto = toml::from_str(doc).unwrap();
        let vote = Vote::try_from(ledger.votes[0].clone()).unwrap();
        assert_eq!(vote.vote_weight.get(), 1);
        assert_eq!(vote.category, Category::Drift);
    }

    #[test]
    fn test_out_of_range_weight_is_refused() {
        let mut dto = VoteDto::from(&Vote::new(
            "u-1",
            "c-1",
            Category::Drift,
            VoteWeight::default(),
            Utc::now(),
        ));
        dto.vote_weight = 42;
        assert!(Vote::try_from(dto).unwrap_err().is_validation());
    }
}
