//! Profile subcommands: show a user's profile, set the bio.

use anyhow::{Result, bail};
use clap::Subcommand;
use console::style;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Show a user's profile.
    Show {
        /// Username whose profile to show.
        username: String,
    },

    /// Replace a user's bio text.
    SetBio {
        /// Username whose profile to edit.
        username: String,

        /// New bio text.
        bio: String,
    },
}

pub async fn run(state: &AppState, command: ProfileCommand, json: bool) -> Result<()> {
    match command {
        ProfileCommand::Show { username } => show(state, &username, json).await,
        ProfileCommand::SetBio { username, bio } => set_bio(state, &username, &bio, json).await,
    }
}

async fn show(state: &AppState, username: &str, json: bool) -> Result<()> {
    let Some(user) = state.stores.users.get_by_username(username) else {
        bail!("unknown user '{username}'");
    };
    let Some(profile) = state.stores.profiles.get_by_id(&user.profile_id) else {
        bail!("no profile on record for '{username}'");
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "username": user.username,
                "bio": profile.bio,
                "member_since": user.created_at,
            }))?
        );
        return Ok(());
    }

    println!();
    println!("  {}", style(&user.username).cyan().bold());
    println!(
        "  Member since {}",
        user.created_at.format("%Y-%m-%d")
    );
    println!();
    if profile.bio.is_empty() {
        println!("  (no bio set)");
    } else {
        println!("  {}", profile.bio);
    }
    println!();
    Ok(())
}

async fn set_bio(state: &AppState, username: &str, bio: &str, json: bool) -> Result<()> {
    let Some(user) = state.stores.users.get_by_username(username) else {
        bail!("unknown user '{username}'");
    };
    let Some(mut profile) = state.stores.profiles.get_by_id(&user.profile_id) else {
        bail!("no profile on record for '{username}'");
    };

    profile.bio = bio.to_string();
    state.stores.profiles.update(profile.clone()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!();
        println!(
            "  {} Updated bio for '{}'",
            style("ok").green(),
            style(username).cyan()
        );
        println!();
    }

    Ok(())
}
