//! Ballot eligibility derived from ledger history.
//!
//! A voter gets two casts per category at most: the first, and one final
//! cast after spending their single cancellation. The cancellation record is
//! the durable limiter, so deleting a vote never resets the allowance.

use serde::{Deserialize, Serialize};

/// Where a voter stands in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallotStage {
    /// No vote, no cancellation: the first cast is available
    Open,
    /// Active first vote; the one cancellation is still available
    Cast,
    /// Cancelled once and not yet re-voted: the final cast is available
    Reopened,
    /// Final vote cast after a cancellation: nothing more can change
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    pub stage: BallotStage,
    pub can_vote: bool,
    pub can_cancel: bool,
}

impl Eligibility {
    /// Derives eligibility from whether an active vote and a cancellation exist.
    pub fn from_history(vote_present: bool, cancellation_present: bool) -> Self {
        let stage = match (vote_present, cancellation_present) {
            (false, false) => BallotStage::Open,
            (true, false) => BallotStage::Cast,
            (false, true) => BallotStage::Reopened,
            (true, true) => BallotStage::Locked,
        };
        Self::from_stage(stage)
    }

    pub fn from_stage(stage: BallotStage) -> Self {
        let (can_vote, can_cancel) = match stage {
            BallotStage::Open | BallotStage::Reopened => (true, false),
            BallotStage::Cast => (false, true),
            BallotStage::Locked => (false, false),
        };
        Self {
            stage,
            can_vote,
            can_cancel,
        }
    }

    /// True when the next cast would be the voter's last one.
    pub fn is_final_cast(&self) -> bool {
        self.stage == BallotStage::Reopened
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligibility_table() {
        let open = Eligibility::from_history(false, false);
        assert_eq!((open.can_vote, open.can_cancel), (true, false));
        assert_eq!(open.stage, BallotStage::Open);

        let cast = Eligibility::from_history(true, false);
        assert_eq!((cast.can_vote, cast.can_cancel), (false, true));

        let reopened = Eligibility::from_history(false, true);
        assert_eq!((reopened.can_vote, reopened.can_cancel), (true, false));
        assert!(reopened.is_final_cast());

        let locked = Eligibility::from_history(true, true);
        assert_eq!((locked.can_vote, locked.can_cancel), (false, false));
        assert_eq!(locked.stage, BallotStage::Locked);
    }
}
