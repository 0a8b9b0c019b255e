use anyhow::{Result, bail};
use chrono::{Duration, Utc};

use crate::context::AppContext;

pub async fn run(ctx: &AppContext, hours: i64, send: bool) -> Result<()> {
    if hours <= 0 {
        bail!("--hours must be positive, got {hours}");
    }
    let window = Duration::hours(hours);

    if send {
        let sent = ctx.summaries().send_summaries(window).await?;
        println!("Sent {} summaries", sent);
        return Ok(());
    }

    let tallies = ctx.summaries().tally_since(Utc::now() - window).await?;
    if tallies.is_empty() {
        println!("No votes in the last {} h", hours);
        return Ok(());
    }
    for tally in tallies {
        println!(
            "{:<12} {:>3} votes {:>4} points",
            tally.car_id, tally.votes, tally.points
        );
    }
    Ok(())
}

pub async fn standings(ctx: &AppContext) -> Result<()> {
    let category = ctx.ballot().daily_mode().await?;
    let standings = ctx.summaries().standings(category).await?;
    println!("Standings for {}", category);
    for row in standings {
        println!(
            "{:>3}. {:<30} {:>4} points ({} votes)",
            row.rank,
            row.car.label(),
            row.points,
            row.votes
        );
    }
    Ok(())
}
