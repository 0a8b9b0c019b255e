//! Periodic vote digests for car owners and the overall standings.

use chrono::{DateTime, Duration, Utc};
use paddock_core::ballot::{BallotLedger, Category, Vote};
use paddock_core::clock::Clock;
use paddock_core::error::Result;
use paddock_core::notification::{
    Notification, NotificationDispatcher, NotificationKind, notify_or_log,
};
use paddock_core::roster::{Car, RosterRepository};
use std::collections::HashMap;
use std::sync::Arc;

/// Weighted votes one car received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarTally {
    pub car_id: String,
    /// Number of ballots
    pub votes: usize,
    /// Sum of ballot weights
    pub points: u32,
}

/// A car's place in its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub rank: usize,
    pub car: Car,
    pub votes: usize,
    pub points: u32,
}

pub struct VoteSummaryService {
    ledger: Arc<dyn BallotLedger>,
    roster: Arc<dyn RosterRepository>,
    notifier: Arc<dyn NotificationDispatcher>,
    clock: Arc<dyn Clock>,
}

impl VoteSummaryService {
    pub fn new(
        ledger: Arc<dyn BallotLedger>,
        roster: Arc<dyn RosterRepository>,
        notifier: Arc<dyn NotificationDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger,
            roster,
            notifier,
            clock,
        }
    }

    /// Groups active votes created at or after `since` by car, highest first.
    pub async fn tally_since(&self, since: DateTime<Utc>) -> Result<Vec<CarTally>> {
        let votes = self.ledger.list_votes_since(since).await?;
        Ok(tally(&votes))
    }

    /// Sends each owner a digest of the votes their car got within `window`.
    ///
    /// The count in each digest ("got N votes") is the car's weighted point
    /// total, the sum of ballot weights, not the number of ballots in
    /// `CarTally::votes`. One ballot of weight 3 reads as "3 votes".
    ///
    /// Returns the number of notifications sent. Cars missing from the roster
    /// are skipped.
    pub async fn send_summaries(&self, window: Duration) -> Result<usize> {
        let now = self.clock.now();
        let tallies = self.tally_since(now - window).await?;
        if tallies.is_empty() {
            tracing::info!("[VoteSummary] No votes in the last {}", describe_window(window));
            return Ok(0);
        }

        let mut sent = 0;
        for entry in &tallies {
            let Some(car) = self.roster.find_car(&entry.car_id).await? else {
                tracing::warn!("[VoteSummary] Car {} is not in the roster", entry.car_id);
                continue;
            };
            let noun = if entry.points == 1 { "vote" } else { "votes" };
            let body = format!(
                "Your car {} got {} {} in the last {}",
                car.label(),
                entry.points,
                noun,
                describe_window(window)
            );
            notify_or_log(
                self.notifier.as_ref(),
                Notification::to_user(NotificationKind::VoteSummary, car.owner_id, body, now),
            )
            .await;
            sent += 1;
        }

        tracing::info!("[VoteSummary] Sent summaries for {} cars", sent);
        Ok(sent)
    }

    /// Ranks every car entered in `category` by weighted points.
    ///
    /// Cars without votes are listed with zero points. Ties share a rank.
    pub async fn standings(&self, category: Category) -> Result<Vec<Standing>> {
        let cars = self.roster.list_cars(category).await?;
        let votes = self.ledger.list_votes(category).await?;
        let by_car: HashMap<String, CarTally> = tally(&votes)
            .into_iter()
            .map(|t| (t.car_id.clone(), t))
            .collect();

        let mut rows: Vec<(Car, usize, u32)> = cars
            .into_iter()
            .map(|car| {
                let (votes, points) = by_car
                    .get(&car.id)
                    .map(|t| (t.votes, t.points))
                    .unwrap_or((0, 0));
                (car, votes, points)
            })
            .collect();
        rows.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.id.cmp(&b.0.id)));

        let mut standings: Vec<Standing> = Vec::with_capacity(rows.len());
        for (index, (car, votes, points)) in rows.into_iter().enumerate() {
            let rank = match standings.last() {
                Some(prev) if prev.points == points => prev.rank,
                _ => index + 1,
            };
            standings.push(Standing {
                rank,
                car,
                votes,
                points,
            });
        }
        Ok(standings)
    }
}

fn tally(votes: &[Vote]) -> Vec<CarTally> {
    let mut by_car: HashMap<&str, CarTally> = HashMap::new();
    for vote in votes {
        let entry = by_car.entry(vote.car_id.as_str()).or_insert_with(|| CarTally {
            car_id: vote.car_id.clone(),
            votes: 0,
            points: 0,
        });
        entry.votes += 1;
        entry.points += u32::from(vote.vote_weight.get());
    }

    let mut tallies: Vec<CarTally> = by_car.into_values().collect();
    tallies.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.car_id.cmp(&b.car_id)));
    tallies
}

fn describe_window(window: Duration) -> String {
    match window.num_hours() {
        1 => "hour".to_string(),
        h if h > 1 => format!("{h} hours"),
        _ => format!("{} minutes", window.num_minutes()),
    }
}
