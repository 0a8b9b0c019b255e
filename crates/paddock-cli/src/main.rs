use anyhow::Result;
use clap::{Parser, Subcommand};
use paddock_core::ballot::Category;
use paddock_core::session::Group;
use std::path::PathBuf;

mod commands;
mod context;
mod logging;

use context::AppContext;

#[derive(Parser)]
#[command(name = "paddock")]
#[command(about = "Paddock - heat timing and audience voting for track days", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run heats on the shared track clock
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Cast, cancel and inspect ballots
    Vote {
        #[command(subcommand)]
        action: VoteAction,
    },
    /// Show or change the category that is voted on today
    Mode {
        #[command(subcommand)]
        action: ModeAction,
    },
    /// Tally recent votes per car
    Summary {
        /// Window to tally, in hours
        #[arg(long, default_value_t = 1)]
        hours: i64,
        /// Notify every owner about their car's votes
        #[arg(long)]
        send: bool,
    },
    /// Rank the cars of the current category
    Standings,
    /// Follow the track clock and ballot state until Ctrl-C
    Watch {
        /// Also follow this user's ballot
        #[arg(long)]
        user: Option<String>,
    },
    /// Send a message from the operator to everyone
    Broadcast {
        /// Name shown as the sender
        #[arg(long = "from")]
        from: String,
        message: String,
    },
    /// List delivered notifications
    Inbox {
        /// Only notifications for this user, plus broadcasts
        #[arg(long)]
        user: Option<String>,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Start a heat for a skill group
    Start {
        #[arg(long)]
        group: Group,
        /// Heat length; the configured default when omitted
        #[arg(long)]
        minutes: Option<u32>,
    },
    Pause,
    Resume,
    Complete,
    /// Show the running heat and its countdown
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Show recently completed heats
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum VoteAction {
    /// Vote for a car in today's category
    Cast {
        #[arg(long)]
        user: String,
        #[arg(long)]
        car: String,
    },
    /// Use the one cancellation of today's category
    Cancel {
        #[arg(long)]
        user: String,
        /// Admin cancelling on the user's behalf
        #[arg(long = "as")]
        actor: Option<String>,
    },
    /// Show what the user can still do today
    Status {
        #[arg(long)]
        user: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ModeAction {
    Get,
    Set { category: Category },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = AppContext::load(cli.config)?;
    let _log_guard = logging::init(&ctx.config.logging, &ctx.paths.logs_dir());

    match cli.command {
        Commands::Session { action } => match action {
            SessionAction::Start { group, minutes } => {
                commands::session::start(&ctx, group, minutes).await?
            }
            SessionAction::Pause => commands::session::pause(&ctx).await?,
            SessionAction::Resume => commands::session::resume(&ctx).await?,
            SessionAction::Complete => commands::session::complete(&ctx).await?,
            SessionAction::Status { json } => commands::session::status(&ctx, json).await?,
            SessionAction::History { limit } => commands::session::history(&ctx, limit).await?,
        },
        Commands::Vote { action } => match action {
            VoteAction::Cast { user, car } => commands::vote::cast(&ctx, &user, &car).await?,
            VoteAction::Cancel { user, actor } => {
                let actor = actor.unwrap_or_else(|| user.clone());
                commands::vote::cancel(&ctx, &actor, &user).await?
            }
            VoteAction::Status { user, json } => commands::vote::status(&ctx, &user, json).await?,
        },
        Commands::Mode { action } => match action {
            ModeAction::Get => commands::mode::get(&ctx).await?,
            ModeAction::Set { category } => commands::mode::set(&ctx, category).await?,
        },
        Commands::Summary { hours, send } => commands::summary::run(&ctx, hours, send).await?,
        Commands::Standings => commands::summary::standings(&ctx).await?,
        Commands::Watch { user } => commands::watch::run(&ctx, user).await?,
        Commands::Broadcast { from, message } => {
            commands::broadcast::send(&ctx, &from, &message).await?
        }
        Commands::Inbox { user } => commands::inbox::list(&ctx, user.as_deref()).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cancel_on_behalf_parses() {
        let cli = Cli::parse_from(["paddock", "vote", "cancel", "--user", "kei", "--as", "ola"]);
        match cli.command {
            Commands::Vote {
                action: VoteAction::Cancel { user, actor },
            } => {
                assert_eq!(user, "kei");
                assert_eq!(actor.as_deref(), Some("ola"));
            }
            _ => panic!("expected vote cancel"),
        }
    }

    #[test]
    fn test_group_and_category_values_parse() {
        let cli = Cli::parse_from(["paddock", "session", "start", "--group", "advanced"]);
        assert!(matches!(
            cli.command,
            Commands::Session {
                action: SessionAction::Start {
                    group: Group::Advanced,
                    minutes: None
                }
            }
        ));

        let cli = Cli::parse_from(["paddock", "mode", "set", "time-attack"]);
        assert!(matches!(
            cli.command,
            Commands::Mode {
                action: ModeAction::Set {
                    category: Category::TimeAttack
                }
            }
        ));
    }

    #[test]
    fn test_broadcast_takes_sender_and_message() {
        let cli = Cli::parse_from([
            "paddock",
            "broadcast",
            "--from",
            "Race Control",
            "Track closes in 5 minutes",
        ]);
        match cli.command {
            Commands::Broadcast { from, message } => {
                assert_eq!(from, "Race Control");
                assert_eq!(message, "Track closes in 5 minutes");
            }
            _ => panic!("expected broadcast"),
        }
    }
}
