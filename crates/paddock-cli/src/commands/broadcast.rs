use anyhow::Result;

use crate::context::AppContext;

pub async fn send(ctx: &AppContext, from: &str, message: &str) -> Result<()> {
    let sent = ctx.broadcasts().broadcast(from, message).await?;
    println!("Broadcast sent at {}", sent.created_at.format("%H:%M:%S"));
    Ok(())
}
