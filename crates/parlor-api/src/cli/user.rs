//! User subcommands: register, login, list.

use anyhow::{Result, bail};
use comfy_table::{ContentArrangement, Table, presets};
use console::style;
use dialoguer::Password;

use parlor_infra::crypto::password::{hash_password, verify_password};
use parlor_types::activity::{Activity, ActivityKind};
use parlor_types::profile::Profile;
use parlor_types::user::User;

use crate::state::AppState;

/// Register a new user: fresh profile, hashed password, activity entry.
///
/// The uniqueness probe happens before the insert; if another process
/// registers the same name in between, both writes land (same exposure
/// as the original design).
pub async fn register(state: &AppState, username: &str, json: bool) -> Result<()> {
    if state.stores.users.is_registered(username) {
        bail!("username '{username}' is already taken");
    }

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;
    let password_hash = hash_password(&password)?;

    let profile = Profile::new();
    state.stores.profiles.add(profile.clone()).await?;

    let user = User::new(username, password_hash, profile.id);
    state.stores.users.add(user.clone()).await?;

    state
        .stores
        .activities
        .add(Activity::new(ActivityKind::User, user.id, user.id))
        .await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "id": user.id,
                "username": user.username,
                "profile_id": user.profile_id,
            }))?
        );
    } else {
        println!();
        println!(
            "  {} Registered '{}'",
            style("ok").green(),
            style(username).cyan()
        );
        println!();
    }

    Ok(())
}

/// Check a username and password against the stored credentials.
pub async fn login(state: &AppState, username: &str, json: bool) -> Result<()> {
    let Some(user) = state.stores.users.get_by_username(username) else {
        bail!("unknown user '{username}'");
    };

    let password = Password::new().with_prompt("Password").interact()?;
    if !verify_password(&password, &user.password_hash) {
        bail!("invalid password for '{username}'");
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "id": user.id,
                "username": user.username,
                "is_admin": user.is_admin,
            }))?
        );
    } else {
        println!();
        println!(
            "  {} Logged in as '{}'",
            style("ok").green(),
            style(username).cyan()
        );
        println!();
    }

    Ok(())
}

/// List all registered users in creation order.
pub async fn list_users(state: &AppState, json: bool) -> Result<()> {
    let users = state.stores.users.all();

    if json {
        println!("{}", serde_json::to_string_pretty(&users)?);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Username", "Admin", "Registered"]);

    for user in &users {
        table.add_row(vec![
            user.username.clone(),
            if user.is_admin { "yes".into() } else { "".into() },
            user.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }

    println!("{table}");
    println!("  {} user(s)", users.len());
    Ok(())
}
