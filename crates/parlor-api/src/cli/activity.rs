//! Activity feed rendering.

use anyhow::Result;
use comfy_table::{ContentArrangement, Table, presets};

use parlor_types::activity::{Activity, ActivityKind};

use crate::state::AppState;

/// Show the activity feed, newest first.
pub async fn feed(state: &AppState, json: bool) -> Result<()> {
    let activities = state.stores.activities.all();

    if json {
        println!("{}", serde_json::to_string_pretty(&activities)?);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["When", "Who", "What"]);

    for activity in &activities {
        let who = state
            .stores
            .users
            .get_by_id(&activity.owner_id)
            .map(|u| u.username)
            .unwrap_or_else(|| "?".to_string());
        table.add_row(vec![
            activity.created_at.format("%Y-%m-%d %H:%M").to_string(),
            who,
            describe(state, activity),
        ]);
    }

    println!("{table}");
    println!("  {} entries", activities.len());
    Ok(())
}

/// Human-readable description of one feed entry, with the subject
/// resolved against the stores where it still exists.
fn describe(state: &AppState, activity: &Activity) -> String {
    match activity.kind {
        ActivityKind::User => "registered".to_string(),
        ActivityKind::Conversation => {
            match state.stores.conversations.get_by_id(&activity.subject_id) {
                Some(conv) => format!("created conversation '{}'", conv.title),
                None => "created a conversation".to_string(),
            }
        }
        ActivityKind::Group => match state.stores.groups.get_by_id(&activity.subject_id) {
            Some(group) => format!("created group '{}'", group.title),
            None => "created a group".to_string(),
        },
        ActivityKind::Message => {
            let Some(message) = state.stores.messages.get_by_id(&activity.subject_id) else {
                return "posted a message".to_string();
            };
            let conversation = state
                .stores
                .conversations
                .get_by_id(&message.conversation_id)
                .map(|c| c.title)
                .unwrap_or_else(|| "?".to_string());
            format!("posted in '{conversation}': {}", snippet(&message.content))
        }
    }
}

fn snippet(content: &str) -> String {
    const LIMIT: usize = 60;
    if content.chars().count() <= LIMIT {
        content.to_string()
    } else {
        let cut: String = content.chars().take(LIMIT).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_leaves_short_content_alone() {
        assert_eq!(snippet("hello"), "hello");
    }

    #[test]
    fn test_snippet_truncates_long_content() {
        let long = "x".repeat(200);
        let cut = snippet(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 63);
    }
}
