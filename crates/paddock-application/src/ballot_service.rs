//! Ballot use cases: eligibility, casting and the one-time cancellation.

use paddock_core::ballot::{BallotLedger, Category, Eligibility, Vote, VoteCancellation};
use paddock_core::clock::Clock;
use paddock_core::error::{PaddockError, Result};
use paddock_core::notification::{
    Notification, NotificationDispatcher, NotificationKind, notify_or_log,
};
use paddock_core::roster::{Car, RosterRepository, Voter};
use paddock_core::settings::SettingsRepository;
use std::sync::Arc;

/// Service enforcing the per-category ballot rules.
///
/// Each voter gets one vote per category, may cancel it once, and then casts
/// a final vote. The ledger's uniqueness constraints back these rules when
/// two requests race.
pub struct BallotService {
    ledger: Arc<dyn BallotLedger>,
    roster: Arc<dyn RosterRepository>,
    settings: Arc<dyn SettingsRepository>,
    notifier: Arc<dyn NotificationDispatcher>,
    clock: Arc<dyn Clock>,
}

impl BallotService {
    pub fn new(
        ledger: Arc<dyn BallotLedger>,
        roster: Arc<dyn RosterRepository>,
        settings: Arc<dyn SettingsRepository>,
        notifier: Arc<dyn NotificationDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger,
            roster,
            settings,
            notifier,
            clock,
        }
    }

    pub async fn eligibility(&self, user_id: &str, category: Category) -> Result<Eligibility> {
        let vote = self.ledger.find_vote(user_id, category).await?;
        let cancellation = self.ledger.find_cancellation(user_id, category).await?;
        Ok(Eligibility::from_history(
            vote.is_some(),
            cancellation.is_some(),
        ))
    }

    /// Casts a vote for `car_id` in `category`.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown voter or car
    /// - `SelfVote` when the voter entered the car
    /// - `Validation` when the car competes in another category
    /// - `AlreadyVoted` when the voter has no cast left
    pub async fn vote(&self, user_id: &str, car_id: &str, category: Category) -> Result<Vote> {
        let voter = self.require_voter(user_id).await?;
        let car = self
            .roster
            .find_car(car_id)
            .await?
            .ok_or_else(|| PaddockError::not_found("Car", car_id))?;

        if car.owner_id == user_id {
            return Err(PaddockError::SelfVote {
                user_id: user_id.to_string(),
                car_id: car_id.to_string(),
            });
        }
        if car.category != category {
            return Err(PaddockError::validation(format!(
                "car {} competes in {}, not {}",
                car.label(),
                car.category,
                category
            )));
        }

        let eligibility = self.eligibility(user_id, category).await?;
        if !eligibility.can_vote {
            return Err(already_voted(user_id, category));
        }

        let vote = Vote::new(
            user_id,
            car_id,
            category,
            voter.vote_weight,
            self.clock.now(),
        );
        self.ledger.insert_vote(&vote).await.map_err(|e| {
            if e.is_conflict() {
                already_voted(user_id, category)
            } else {
                e
            }
        })?;

        tracing::info!(
            "[BallotService] {} voted for {} in {}{}",
            user_id,
            car_id,
            category,
            if eligibility.is_final_cast() {
                " (final cast)"
            } else {
                ""
            }
        );

        self.notify_owner(&voter, &car, &vote).await;
        Ok(vote)
    }

    /// Cancels the voter's active vote, spending their one cancellation.
    ///
    /// The marker is written before the vote is removed and names the vote
    /// it cancels. Removal is by vote id, so a caller acting on a stale read
    /// can only ever remove the vote its marker names. A concurrent cancel
    /// that loses the race on the marker succeeds only when the winning
    /// marker names the same vote.
    pub async fn cancel_vote(&self, user_id: &str, category: Category) -> Result<()> {
        let vote = self.ledger.find_vote(user_id, category).await?;
        let existing = self.ledger.find_cancellation(user_id, category).await?;

        let vote = match (vote, existing) {
            (Some(vote), Some(marker)) if marker.cancels(&vote) => {
                tracing::debug!(
                    "[BallotService] Cancellation of {} already recorded, removing the vote",
                    vote.id
                );
                self.ledger.delete_vote(&vote.id).await?;
                return Ok(());
            }
            (_, Some(_)) => {
                return Err(cancel_not_allowed(
                    user_id,
                    category,
                    "the cancellation was already used",
                ));
            }
            (None, None) => {
                return Err(cancel_not_allowed(
                    user_id,
                    category,
                    "there is no vote to cancel",
                ));
            }
            (Some(vote), None) => vote,
        };

        let cancellation = VoteCancellation::for_vote(&vote, self.clock.now());
        match self.ledger.insert_cancellation(&cancellation).await {
            Ok(()) => {}
            Err(e) if e.is_conflict() => {
                let winner = self.ledger.find_cancellation(user_id, category).await?;
                if !winner.is_some_and(|marker| marker.cancels(&vote)) {
                    return Err(cancel_not_allowed(
                        user_id,
                        category,
                        "the cancellation was already used",
                    ));
                }
                tracing::debug!(
                    "[BallotService] Concurrent cancellation of {} already recorded",
                    vote.id
                );
            }
            Err(e) => return Err(e),
        }
        self.ledger.delete_vote(&vote.id).await?;

        tracing::info!(
            "[BallotService] {} cancelled their {} vote for {}",
            user_id,
            category,
            vote.car_id
        );
        Ok(())
    }

    /// Cancels `user_id`'s vote on behalf of `actor_id`.
    ///
    /// Only admins may act for somebody else.
    pub async fn cancel_vote_on_behalf(
        &self,
        actor_id: &str,
        user_id: &str,
        category: Category,
    ) -> Result<()> {
        if actor_id != user_id {
            let actor = self.require_voter(actor_id).await?;
            if !actor.is_admin() {
                return Err(PaddockError::permission(format!(
                    "{actor_id} cannot cancel the vote of {user_id}"
                )));
            }
            tracing::info!(
                "[BallotService] Admin {} cancels the {} vote of {}",
                actor_id,
                category,
                user_id
            );
        }
        self.cancel_vote(user_id, category).await
    }

    /// The category whose ballot is live today.
    pub async fn daily_mode(&self) -> Result<Category> {
        self.settings.daily_mode().await
    }

    /// Switches the live category. Existing votes in either category are kept.
    pub async fn set_daily_mode(&self, category: Category) -> Result<()> {
        self.settings.set_daily_mode(category).await?;
        tracing::info!("[BallotService] Daily mode set to {}", category);
        Ok(())
    }

    pub async fn eligibility_live(&self, user_id: &str) -> Result<(Category, Eligibility)> {
        let category = self.daily_mode().await?;
        Ok((category, self.eligibility(user_id, category).await?))
    }

    pub async fn vote_live(&self, user_id: &str, car_id: &str) -> Result<Vote> {
        let category = self.daily_mode().await?;
        self.vote(user_id, car_id, category).await
    }

    pub async fn cancel_vote_live(&self, actor_id: &str, user_id: &str) -> Result<Category> {
        let category = self.daily_mode().await?;
        self.cancel_vote_on_behalf(actor_id, user_id, category)
            .await?;
        Ok(category)
    }

    /// Cars entered in the live category.
    pub async fn live_cars(&self) -> Result<Vec<Car>> {
        let category = self.daily_mode().await?;
        self.roster.list_cars(category).await
    }

    async fn require_voter(&self, user_id: &str) -> Result<Voter> {
        self.roster
            .find_voter(user_id)
            .await?
            .ok_or_else(|| PaddockError::not_found("Voter", user_id))
    }

    async fn notify_owner(&self, voter: &Voter, car: &Car, vote: &Vote) {
        let notification = Notification::to_user(
            NotificationKind::VoteCastOnMyCar,
            car.owner_id.clone(),
            format!("{} voted for your car: {}", voter.name, car.label()),
            vote.created_at,
        )
        .with_sender(voter.name.clone());
        notify_or_log(self.notifier.as_ref(), notification).await;
    }
}

fn already_voted(user_id: &str, category: Category) -> PaddockError {
    PaddockError::AlreadyVoted {
        user_id: user_id.to_string(),
        category,
    }
}

fn cancel_not_allowed(user_id: &str, category: Category, reason: &str) -> PaddockError {
    PaddockError::CancelNotAllowed {
        user_id: user_id.to_string(),
        category,
        reason: reason.to_string(),
    }
}
