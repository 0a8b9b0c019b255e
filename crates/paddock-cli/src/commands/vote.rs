use anyhow::{Context, Result};
use paddock_core::ballot::BallotStage;
use serde_json::json;

use crate::context::AppContext;

pub async fn cast(ctx: &AppContext, user_id: &str, car_id: &str) -> Result<()> {
    let vote = ctx.ballot().vote_live(user_id, car_id).await?;
    println!(
        "{} voted for {} in {} (weight {})",
        vote.user_id,
        vote.car_id,
        vote.category,
        vote.vote_weight.get()
    );
    Ok(())
}

pub async fn cancel(ctx: &AppContext, actor_id: &str, user_id: &str) -> Result<()> {
    let category = ctx.ballot().cancel_vote_live(actor_id, user_id).await?;
    println!(
        "Vote of {} in {} cancelled; one final vote is left",
        user_id, category
    );
    Ok(())
}

pub async fn status(ctx: &AppContext, user_id: &str, json: bool) -> Result<()> {
    let (category, eligibility) = ctx.ballot().eligibility_live(user_id).await?;

    if json {
        let payload = json!({ "category": category, "eligibility": eligibility });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("Failed to encode eligibility")?
        );
        return Ok(());
    }

    let summary = match eligibility.stage {
        BallotStage::Open => "can vote",
        BallotStage::Cast => "has voted and may cancel once",
        BallotStage::Reopened => "cancelled once; the next vote is final",
        BallotStage::Locked => "has cast the final vote",
    };
    println!("{} in {}: {}", user_id, category, summary);

    if eligibility.can_vote {
        for car in ctx.ballot().live_cars().await? {
            println!("  {}  {}", car.id, car.label());
        }
    }
    Ok(())
}
