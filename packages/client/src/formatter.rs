//! Message formatting utilities for client display.

use handraise_shared::time::timestamp_to_rfc3339;

use crate::{
    countdown::format_remaining,
    view::{ClientView, HandChange},
};

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the banner shown once the room is joined
    pub fn format_welcome(view: &ClientView, join_url: &str) -> String {
        format!(
            "\nJoined room '{}' as '{}'.\nShare the room: {}\nType 'help' for commands.\n",
            view.room_id, view.username, join_url
        )
    }

    /// Format the member list, marking the current user with "(me)"
    ///
    /// # Returns
    ///
    /// A formatted string with every member painted in its own colour
    pub fn format_members(view: &ClientView) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str(&format!("Members of '{}':\n", view.room_id));

        if view.members.is_empty() {
            output.push_str("(No members)\n");
        } else {
            for member in &view.members {
                let me_suffix = if member.username == view.username {
                    " (me)"
                } else {
                    ""
                };
                output.push_str(&format!(
                    "{}{}\n",
                    member.color.paint(display_name(&member.username)),
                    me_suffix
                ));
            }
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format the current hand state
    pub fn format_hand_state(view: &ClientView) -> String {
        let Some(state) = view.hand_state.as_ref() else {
            return "\nNobody has raised a hand yet\n".to_string();
        };

        if !state.is_raised() {
            return format!(
                "\nNobody is raising a hand (last: {})\n",
                display_name(&state.username)
            );
        }

        let name = view
            .color_of(&state.username)
            .paint(display_name(&state.username));
        let raised_at = timestamp_to_rfc3339(state.timestamp_milliseconds)
            .map(|t| format!(" at {}", t))
            .unwrap_or_default();
        if view.is_current_user_holding() {
            format!("\n✋ You ({}) are raising your hand{}\n", name, raised_at)
        } else {
            format!("\n✋ {} is raising a hand{}\n", name, raised_at)
        }
    }

    /// Format an inbound hand state change; `None` when nothing changed
    pub fn format_hand_change(view: &ClientView, change: HandChange) -> Option<String> {
        let last_holder = view
            .hand_state
            .as_ref()
            .map(|s| display_name(&s.username))
            .unwrap_or_default();
        match change {
            HandChange::Unchanged => None,
            HandChange::Raised | HandChange::Idle => Some(Self::format_hand_state(view)),
            HandChange::Lowered => Some(format!(
                "\n↓ {} lowered their hand. Anyone may raise now.\n",
                last_holder
            )),
            HandChange::Expired => Some(format!(
                "\n⌛ {}'s hand timed out. Anyone may raise now.\n",
                last_holder
            )),
        }
    }

    /// Format one countdown tick for the holder
    pub fn format_countdown(holder: &str, remaining_millis: i64) -> String {
        format!(
            "\n  {}: {}s left\n",
            display_name(holder),
            format_remaining(remaining_millis)
        )
    }

    /// Shown when `raise` is typed while someone else holds the hand
    pub fn format_raise_unavailable(holder: &str) -> String {
        format!(
            "\n{} is raising a hand. Wait until it is lowered.\n",
            display_name(holder)
        )
    }

    pub fn format_already_raising() -> String {
        "\nYou are already raising your hand.\n".to_string()
    }

    /// Shown when `lower` is typed without holding the hand
    pub fn format_not_holding() -> String {
        "\nYou are not raising your hand.\n".to_string()
    }

    pub fn format_disconnected(reason: &str) -> String {
        format!("\nDISCONNECTED: {}\n", reason)
    }

    pub fn format_unknown_command(line: &str) -> String {
        format!("\nUnknown command '{}'. Type 'help' for commands.\n", line)
    }

    pub fn format_help() -> String {
        "\nCommands:\n  raise (r)  raise your hand\n  lower (l)  lower your hand\n  who   (w)  show members and hand state\n  help  (h)  show this help\n  quit  (q)  leave the room\n"
            .to_string()
    }
}

fn display_name(username: &str) -> &str {
    if username.is_empty() {
        "(anonymous)"
    } else {
        username
    }
}
