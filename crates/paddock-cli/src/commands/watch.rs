use anyhow::{Context, Result};
use paddock_application::SyncView;
use paddock_core::session::Phase;
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;

/// Follows the dashboard view until Ctrl-C, printing one line per change.
pub async fn run(ctx: &AppContext, user_id: Option<String>) -> Result<()> {
    let mut synchronizer = ctx.synchronizer(user_id);
    let mut updates = synchronizer.subscribe();
    let cancel = CancellationToken::new();

    let loop_cancel = cancel.clone();
    let handle = tokio::spawn(async move { synchronizer.run(loop_cancel).await });

    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_cancel.cancel();
        }
    });

    let mut last_line = String::new();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let line = render(&updates.borrow_and_update());
                if line != last_line {
                    println!("{line}");
                    last_line = line;
                }
            }
        }
    }

    handle.await.context("Polling task failed")?;
    Ok(())
}

fn render(view: &SyncView) -> String {
    let mut line = match (&view.session, &view.clock) {
        (Some(session), Some(clock)) if clock.phase == Phase::LastMinute => format!(
            "{} {} {} (last minute)",
            session.group,
            session.status,
            clock.display()
        ),
        (Some(session), Some(clock)) => {
            format!("{} {} {}", session.group, session.status, clock.display())
        }
        _ => "no heat on track".to_string(),
    };
    if view.session_stale {
        line.push_str(" (stale)");
    }
    if let Some(mode) = view.daily_mode {
        line.push_str(&format!(" | voting: {mode}"));
    }
    if let Some(eligibility) = &view.eligibility {
        line.push_str(&format!(
            " | can vote: {}, can cancel: {}",
            eligibility.can_vote, eligibility.can_cancel
        ));
    }
    if let Some(announcement) = &view.announcement {
        line.push_str(&format!(" | {announcement}"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddock_core::ballot::{Category, Eligibility};

    #[test]
    fn test_render_without_session() {
        let view = SyncView {
            daily_mode: Some(Category::Drift),
            eligibility: Some(Eligibility::from_history(false, false)),
            session_stale: true,
            ..SyncView::default()
        };
        assert_eq!(
            render(&view),
            "no heat on track (stale) | voting: drift | can vote: true, can cancel: false"
        );
    }
}
