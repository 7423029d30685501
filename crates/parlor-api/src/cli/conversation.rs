//! Conversation subcommands: create, list, join, vote.

use anyhow::{Result, anyhow, bail};
use chrono::{Duration, Utc};
use comfy_table::{ContentArrangement, Table, presets};
use console::style;

use parlor_types::activity::{Activity, ActivityKind};
use parlor_types::conversation::{Conversation, ConversationKind, Visibility};
use parlor_types::user::User;

use crate::state::AppState;

fn acting_user(state: &AppState, username: &str) -> Result<User> {
    state
        .stores
        .users
        .get_by_username(username)
        .ok_or_else(|| anyhow!("unknown user '{username}'"))
}

/// Create a conversation after probing title uniqueness.
#[allow(clippy::too_many_arguments)]
pub async fn create_conversation(
    state: &AppState,
    title: &str,
    description: &str,
    kind: &str,
    visibility: &str,
    valid_hours: Option<i64>,
    as_user: &str,
    json: bool,
) -> Result<()> {
    let owner = acting_user(state, as_user)?;

    // Probe before insert; the check and the add are separate operations.
    if state.stores.conversations.is_title_taken(title) {
        bail!("a conversation titled '{title}' already exists");
    }

    let kind: ConversationKind = kind.parse().map_err(|e: String| anyhow!(e))?;
    let visibility: Visibility = visibility.parse().map_err(|e: String| anyhow!(e))?;
    let hours = valid_hours.unwrap_or(state.config.default_validity_hours);

    let conversation = Conversation::new(
        owner.id,
        title,
        description,
        kind,
        visibility,
        Duration::hours(hours),
    );
    state.stores.conversations.add(conversation.clone()).await?;

    state
        .stores
        .activities
        .add(Activity::new(
            ActivityKind::Conversation,
            owner.id,
            conversation.id,
        ))
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conversation)?);
    } else {
        println!();
        println!(
            "  {} Created conversation '{}' (valid for {hours}h)",
            style("ok").green(),
            style(title).cyan()
        );
        println!();
    }

    Ok(())
}

/// List all conversations in creation order.
pub async fn list_conversations(state: &AppState, json: bool) -> Result<()> {
    let conversations = state.stores.conversations.all();

    if json {
        println!("{}", serde_json::to_string_pretty(&conversations)?);
        return Ok(());
    }

    let now = Utc::now();
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Title", "Owner", "Kind", "Visibility", "Members", "Points", "Active",
        ]);

    for conv in &conversations {
        let owner = state
            .stores
            .users
            .get_by_id(&conv.owner_id)
            .map(|u| u.username)
            .unwrap_or_else(|| "?".to_string());
        table.add_row(vec![
            conv.title.clone(),
            owner,
            conv.kind.to_string(),
            conv.visibility.to_string(),
            conv.members.len().to_string(),
            conv.total_points.to_string(),
            if conv.is_active(now) { "yes".into() } else { "no".into() },
        ]);
    }

    println!("{table}");
    println!("  {} conversation(s)", conversations.len());
    Ok(())
}

/// Add the acting user to a conversation's member set.
pub async fn join_conversation(
    state: &AppState,
    title: &str,
    as_user: &str,
    json: bool,
) -> Result<()> {
    let user = acting_user(state, as_user)?;
    let Some(mut conversation) = state.stores.conversations.get_by_title(title) else {
        bail!("no conversation titled '{title}'");
    };

    if conversation.is_member(&user.id) {
        bail!("'{as_user}' is already a member of '{title}'");
    }

    conversation.add_member(user.id);
    state.stores.conversations.update(conversation.clone()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conversation)?);
    } else {
        println!();
        println!(
            "  {} '{}' joined '{}'",
            style("ok").green(),
            style(as_user).cyan(),
            style(title).cyan()
        );
        println!();
    }

    Ok(())
}

/// Count or retract a vote on a conversation.
pub async fn vote(
    state: &AppState,
    title: &str,
    as_user: &str,
    up: bool,
    json: bool,
) -> Result<()> {
    let user = acting_user(state, as_user)?;
    let Some(mut conversation) = state.stores.conversations.get_by_title(title) else {
        bail!("no conversation titled '{title}'");
    };

    let changed = if up {
        conversation.upvote(user.id)
    } else {
        conversation.downvote(&user.id)
    };

    if changed {
        state.stores.conversations.update(conversation.clone()).await?;
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "title": conversation.title,
                "total_points": conversation.total_points,
                "changed": changed,
            }))?
        );
    } else if changed {
        println!();
        println!(
            "  {} '{}' now at {} point(s)",
            style("ok").green(),
            style(title).cyan(),
            conversation.total_points
        );
        println!();
    } else {
        println!();
        println!(
            "  {} Nothing to do: {}",
            style("i").blue().bold(),
            if up {
                "vote already counted"
            } else {
                "no vote to retract"
            }
        );
        println!();
    }

    Ok(())
}
