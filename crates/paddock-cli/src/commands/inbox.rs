use anyhow::Result;

use crate::context::AppContext;

pub async fn list(ctx: &AppContext, user_id: Option<&str>) -> Result<()> {
    let notifications = match user_id {
        Some(user_id) => ctx.inbox.list_for(user_id).await?,
        None => ctx.inbox.list_all().await?,
    };

    for n in notifications {
        let from = n
            .sender_name
            .as_deref()
            .map(|s| format!(" from {s}"))
            .unwrap_or_default();
        println!(
            "{}  [{}]{}  {}",
            n.created_at.format("%H:%M:%S"),
            n.kind,
            from,
            n.body
        );
    }
    Ok(())
}
