//! Message subcommands: post to a conversation, list its messages.

use anyhow::{Result, bail};
use chrono::Utc;
use comfy_table::{ContentArrangement, Table, presets};
use console::style;

use parlor_types::activity::{Activity, ActivityKind};
use parlor_types::conversation::Visibility;
use parlor_types::message::Message;

use crate::state::AppState;

/// Post a message to a conversation.
///
/// The conversation must still be inside its validity window, and
/// non-public conversations only accept posts from members.
pub async fn post(
    state: &AppState,
    conversation_title: &str,
    content: &str,
    as_user: &str,
    json: bool,
) -> Result<()> {
    let Some(author) = state.stores.users.get_by_username(as_user) else {
        bail!("unknown user '{as_user}'");
    };
    let Some(conversation) = state.stores.conversations.get_by_title(conversation_title) else {
        bail!("no conversation titled '{conversation_title}'");
    };

    if !conversation.is_active(Utc::now()) {
        bail!("conversation '{conversation_title}' has expired");
    }
    if conversation.visibility != Visibility::Public && !conversation.is_member(&author.id) {
        bail!("'{as_user}' is not a member of '{conversation_title}'");
    }

    let message = Message::new(conversation.id, author.id, content);
    state.stores.messages.add(message.clone()).await?;

    state
        .stores
        .activities
        .add(Activity::new(ActivityKind::Message, author.id, message.id))
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&message)?);
    } else {
        println!();
        println!(
            "  {} Posted to '{}'",
            style("ok").green(),
            style(conversation_title).cyan()
        );
        println!();
    }

    Ok(())
}

/// Show a conversation's messages, oldest first.
pub async fn list_messages(state: &AppState, conversation_title: &str, json: bool) -> Result<()> {
    let Some(conversation) = state.stores.conversations.get_by_title(conversation_title) else {
        bail!("no conversation titled '{conversation_title}'");
    };

    let messages = state.stores.messages.in_conversation(&conversation.id);

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["When", "Author", "Message"]);

    for message in &messages {
        let author = state
            .stores
            .users
            .get_by_id(&message.author_id)
            .map(|u| u.username)
            .unwrap_or_else(|| "?".to_string());
        table.add_row(vec![
            message.created_at.format("%Y-%m-%d %H:%M").to_string(),
            author,
            message.content.clone(),
        ]);
    }

    println!("{table}");
    println!(
        "  {} message(s) in '{}'",
        messages.len(),
        conversation_title
    );
    Ok(())
}
