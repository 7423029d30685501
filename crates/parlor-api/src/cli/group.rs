//! Group subcommands: create, list, join.

use anyhow::{Result, anyhow, bail};
use comfy_table::{ContentArrangement, Table, presets};
use console::style;

use parlor_types::activity::{Activity, ActivityKind};
use parlor_types::group::Group;

use crate::state::AppState;

/// Create a group after probing title uniqueness among groups.
pub async fn create_group(state: &AppState, title: &str, as_user: &str, json: bool) -> Result<()> {
    let Some(owner) = state.stores.users.get_by_username(as_user) else {
        bail!("unknown user '{as_user}'");
    };

    if state.stores.groups.is_title_taken(title) {
        bail!("a group titled '{title}' already exists");
    }

    let group = Group::new(owner.id, title);
    state.stores.groups.add(group.clone()).await?;

    state
        .stores
        .activities
        .add(Activity::new(ActivityKind::Group, owner.id, group.id))
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&group)?);
    } else {
        println!();
        println!(
            "  {} Created group '{}'",
            style("ok").green(),
            style(title).cyan()
        );
        println!();
    }

    Ok(())
}

/// List all groups in creation order.
pub async fn list_groups(state: &AppState, json: bool) -> Result<()> {
    let groups = state.stores.groups.all();

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Title", "Owner", "Members", "Created"]);

    for group in &groups {
        let owner = state
            .stores
            .users
            .get_by_id(&group.owner_id)
            .map(|u| u.username)
            .unwrap_or_else(|| "?".to_string());
        table.add_row(vec![
            group.title.clone(),
            owner,
            group.members.len().to_string(),
            group.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }

    println!("{table}");
    println!("  {} group(s)", groups.len());
    Ok(())
}

/// Add the acting user to a group's member set.
pub async fn join_group(state: &AppState, title: &str, as_user: &str, json: bool) -> Result<()> {
    let user = state
        .stores
        .users
        .get_by_username(as_user)
        .ok_or_else(|| anyhow!("unknown user '{as_user}'"))?;
    let Some(mut group) = state.stores.groups.get_by_title(title) else {
        bail!("no group titled '{title}'");
    };

    if group.is_member(&user.id) {
        bail!("'{as_user}' is already a member of '{title}'");
    }

    group.add_member(user.id);
    state.stores.groups.update(group.clone()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&group)?);
    } else {
        println!();
        println!(
            "  {} '{}' joined group '{}'",
            style("ok").green(),
            style(as_user).cyan(),
            style(title).cyan()
        );
        println!();
    }

    Ok(())
}
