use anyhow::{Context, Result};
use paddock_core::session::{
    Group, Session, SessionDuration, SessionStats, format_minutes_seconds,
};
use serde_json::json;

use crate::context::AppContext;

pub async fn start(ctx: &AppContext, group: Group, minutes: Option<u32>) -> Result<()> {
    let minutes = minutes.unwrap_or(ctx.config.session.default_duration_minutes);
    let duration = SessionDuration::try_from(minutes)?;
    let session = ctx.lifecycle().start(group, duration).await?;
    println!(
        "Heat {} started: {} minutes (session {})",
        session.group, session.duration_minutes, session.id
    );
    Ok(())
}

pub async fn pause(ctx: &AppContext) -> Result<()> {
    let session = ctx.lifecycle().pause().await?;
    println!("Heat {} paused", session.group);
    Ok(())
}

pub async fn resume(ctx: &AppContext) -> Result<()> {
    let session = ctx.lifecycle().resume().await?;
    println!(
        "Heat {} resumed ({} paused in total)",
        session.group,
        format_minutes_seconds(session.total_pause_duration_ms)
    );
    Ok(())
}

pub async fn complete(ctx: &AppContext) -> Result<()> {
    let session = ctx.lifecycle().complete().await?;
    println!(
        "Heat {} completed, {} is up next",
        session.group,
        session.group.next()
    );
    Ok(())
}

pub async fn status(ctx: &AppContext, json: bool) -> Result<()> {
    let active = ctx.lifecycle().active().await?;
    let clock = ctx.lifecycle().clock().await?;

    if json {
        let payload = json!({ "session": active, "clock": clock });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("Failed to encode status")?
        );
        return Ok(());
    }

    match (active, clock) {
        (Some(session), Some(clock)) => {
            println!("Heat {} is {}", session.group, session.status);
            println!("Remaining: {}", clock.display());
        }
        _ => println!("No heat on track"),
    }
    Ok(())
}

pub async fn history(ctx: &AppContext, limit: usize) -> Result<()> {
    let sessions = ctx.lifecycle().history(limit).await?;
    if sessions.is_empty() {
        println!("No completed heats yet");
        return Ok(());
    }

    let stats = ctx.lifecycle().stats(limit).await?;
    for session in &sessions {
        print_history_row(session, stats.iter().find(|s| s.session_id == session.id));
    }
    Ok(())
}

fn print_history_row(session: &Session, stats: Option<&SessionStats>) {
    let started = session.start_time.format("%Y-%m-%d %H:%M");
    match stats {
        Some(stats) => println!(
            "{}  {:<8}  {} on track, {} paused",
            started,
            session.group.as_str(),
            stats.wall_display(),
            stats.pause_display().unwrap_or_else(|| "-".to_string())
        ),
        None => println!("{}  {:<8}", started, session.group.as_str()),
    }
}
