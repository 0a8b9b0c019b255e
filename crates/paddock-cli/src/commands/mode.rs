use anyhow::Result;
use paddock_core::ballot::Category;

use crate::context::AppContext;

pub async fn get(ctx: &AppContext) -> Result<()> {
    println!("{}", ctx.ballot().daily_mode().await?);
    Ok(())
}

pub async fn set(ctx: &AppContext, category: Category) -> Result<()> {
    ctx.ballot().set_daily_mode(category).await?;
    println!("Daily mode set to {}", category);
    Ok(())
}
