//! Parlor CLI entry point.
//!
//! Binary name: `parlor`
//!
//! Parses CLI arguments, loads config, opens the database, hydrates the
//! stores, then dispatches to the appropriate command handler.

mod cli;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, CreateResource, JoinResource, ListResource, VoteAction};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,parlor=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Initialize application state (config, DB, hydrated stores)
    let state = AppState::init().await?;

    match cli.command {
        Commands::Register { username } => {
            cli::user::register(&state, &username, cli.json).await?;
        }

        Commands::Login { username } => {
            cli::user::login(&state, &username, cli.json).await?;
        }

        Commands::Create { resource } => match resource {
            CreateResource::Conversation {
                title,
                description,
                kind,
                visibility,
                valid_hours,
                as_user,
            } => {
                cli::conversation::create_conversation(
                    &state,
                    &title,
                    &description,
                    &kind,
                    &visibility,
                    valid_hours,
                    &as_user,
                    cli.json,
                )
                .await?;
            }
            CreateResource::Group { title, as_user } => {
                cli::group::create_group(&state, &title, &as_user, cli.json).await?;
            }
        },

        Commands::List { resource } => match resource {
            ListResource::Users => {
                cli::user::list_users(&state, cli.json).await?;
            }
            ListResource::Conversations => {
                cli::conversation::list_conversations(&state, cli.json).await?;
            }
            ListResource::Groups => {
                cli::group::list_groups(&state, cli.json).await?;
            }
        },

        Commands::Join { resource } => match resource {
            JoinResource::Conversation { title, as_user } => {
                cli::conversation::join_conversation(&state, &title, &as_user, cli.json).await?;
            }
            JoinResource::Group { title, as_user } => {
                cli::group::join_group(&state, &title, &as_user, cli.json).await?;
            }
        },

        Commands::Post {
            conversation,
            content,
            as_user,
        } => {
            cli::message::post(&state, &conversation, &content, &as_user, cli.json).await?;
        }

        Commands::Messages { conversation } => {
            cli::message::list_messages(&state, &conversation, cli.json).await?;
        }

        Commands::Vote { action } => match action {
            VoteAction::Up {
                conversation,
                as_user,
            } => {
                cli::conversation::vote(&state, &conversation, &as_user, true, cli.json).await?;
            }
            VoteAction::Down {
                conversation,
                as_user,
            } => {
                cli::conversation::vote(&state, &conversation, &as_user, false, cli.json).await?;
            }
        },

        Commands::Profile { action } => {
            cli::profile::run(&state, action, cli.json).await?;
        }

        Commands::Activity => {
            cli::activity::feed(&state, cli.json).await?;
        }
    }

    Ok(())
}
