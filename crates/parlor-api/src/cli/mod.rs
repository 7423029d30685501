//! CLI command definitions and dispatch for the `parlor` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a
//! verb-noun pattern (e.g., `parlor create conversation`, `parlor list
//! users`).

pub mod activity;
pub mod conversation;
pub mod group;
pub mod message;
pub mod profile;
pub mod user;

use clap::{Parser, Subcommand};

/// Multi-room chat, durably persisted.
#[derive(Parser)]
#[command(name = "parlor", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a new user (password prompted).
    Register {
        /// Username; must not already be taken.
        username: String,
    },

    /// Check a username and password against the stored credentials.
    Login {
        username: String,
    },

    /// Create a new conversation or group.
    Create {
        #[command(subcommand)]
        resource: CreateResource,
    },

    /// List resources.
    #[command(alias = "ls")]
    List {
        #[command(subcommand)]
        resource: ListResource,
    },

    /// Join a conversation or group as a member.
    Join {
        #[command(subcommand)]
        resource: JoinResource,
    },

    /// Post a message to a conversation.
    Post {
        /// Conversation title.
        conversation: String,

        /// Message content.
        content: String,

        /// Acting username.
        #[arg(long = "as")]
        as_user: String,
    },

    /// Show the messages in a conversation, oldest first.
    Messages {
        /// Conversation title.
        conversation: String,
    },

    /// Vote on a conversation.
    Vote {
        #[command(subcommand)]
        action: VoteAction,
    },

    /// Show or edit a user's profile.
    Profile {
        #[command(subcommand)]
        action: profile::ProfileCommand,
    },

    /// Show the activity feed, newest first.
    Activity,
}

#[derive(Subcommand)]
pub enum CreateResource {
    /// Create a public conversation.
    Conversation {
        /// Title; must be unique among conversations.
        title: String,

        /// Short description of what the conversation is about.
        #[arg(long, default_value = "")]
        description: String,

        /// What the conversation accepts: text, image, or hybrid.
        #[arg(long, default_value = "text")]
        kind: String,

        /// Visibility scope: public, group, or direct.
        #[arg(long, default_value = "public")]
        visibility: String,

        /// Validity window in hours (defaults from config).
        #[arg(long)]
        valid_hours: Option<i64>,

        /// Acting username (becomes the owner).
        #[arg(long = "as")]
        as_user: String,
    },

    /// Create a private group conversation.
    Group {
        /// Title; must be unique among groups.
        title: String,

        /// Acting username (becomes the owner).
        #[arg(long = "as")]
        as_user: String,
    },
}

#[derive(Subcommand)]
pub enum ListResource {
    /// List all registered users.
    Users,
    /// List all conversations.
    Conversations,
    /// List all groups.
    Groups,
}

#[derive(Subcommand)]
pub enum JoinResource {
    /// Join a conversation.
    Conversation {
        title: String,

        /// Acting username.
        #[arg(long = "as")]
        as_user: String,
    },

    /// Join a group.
    Group {
        title: String,

        /// Acting username.
        #[arg(long = "as")]
        as_user: String,
    },
}

#[derive(Subcommand)]
pub enum VoteAction {
    /// Count a vote for a conversation (one per voter).
    Up {
        /// Conversation title.
        conversation: String,

        /// Acting username.
        #[arg(long = "as")]
        as_user: String,
    },

    /// Retract a previously counted vote.
    Down {
        /// Conversation title.
        conversation: String,

        /// Acting username.
        #[arg(long = "as")]
        as_user: String,
    },
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
    fn test_parse_create_conversation() {
        let cli = Cli::try_parse_from([
            "parlor", "create", "conversation", "general", "--as", "alice",
            "--valid-hours", "48",
        ])
        .unwrap();
        match cli.command {
            Commands::Create {
                resource:
                    CreateResource::Conversation {
                        title,
                        as_user,
                        valid_hours,
                        ..
                    },
            } => {
                assert_eq!(title, "general");
                assert_eq!(as_user, "alice");
                assert_eq!(valid_hours, Some(48));
            }
            _ => panic!("wrong command parsed"),
        }
    }

    #[test]
    fn test_parse_vote_up() {
        let cli =
            Cli::try_parse_from(["parlor", "vote", "up", "general", "--as", "bob"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Vote {
                action: VoteAction::Up { .. }
            }
        ));
    }
}
