use crate::consts::NO_RESPONSE_PLACEHOLDER;
use crate::ultravox_types::{MessageMedium, MessageRole, TranscriptMessage};

use std::fmt::Write;

/// Render the turn sequence into the one-line-per-turn form consumed by the
/// extraction prompt: `"<Role> (<Medium>): <text>"`. Deterministic; identical
/// turn sequences always render identical strings.
pub fn format_transcript(turns: &[TranscriptMessage]) -> String {
    let mut rendered = String::new();
    for turn in turns {
        let role = match turn.role {
            MessageRole::Agent => "Agent",
            MessageRole::User => "User",
            MessageRole::Unknown => "Unknown",
        };
        let medium = match turn.medium {
            Some(MessageMedium::Voice) => "(Voice)",
            _ => "(Text)",
        };
        let text = turn.text.as_deref().unwrap_or(NO_RESPONSE_PLACEHOLDER);
        // Writing to a String cannot fail.
        let _ = writeln!(rendered, "{role} {medium}: {text}");
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: MessageRole, text: Option<&str>, medium: Option<MessageMedium>) -> TranscriptMessage {
        TranscriptMessage {
            role,
            text: text.map(str::to_string),
            medium,
        }
    }

    #[test]
    fn renders_role_medium_and_text_per_line() {
        let turns = vec![
            turn(MessageRole::Agent, Some("Hello."), Some(MessageMedium::Voice)),
            turn(MessageRole::User, Some("Hi there."), Some(MessageMedium::Text)),
        ];
        assert_eq!(
            format_transcript(&turns),
            "Agent (Voice): Hello.\nUser (Text): Hi there.\n"
        );
    }

    #[test]
    fn absent_text_renders_placeholder() {
        let turns = vec![turn(MessageRole::User, None, Some(MessageMedium::Voice))];
        assert_eq!(format_transcript(&turns), "User (Voice): [No response]\n");
    }

    #[test]
    fn unknown_role_and_missing_medium_render_fallbacks() {
        let turns = vec![turn(MessageRole::Unknown, Some("beep"), None)];
        assert_eq!(format_transcript(&turns), "Unknown (Text): beep\n");
    }

    #[test]
    fn identical_turn_sequences_render_identically() {
        let turns = vec![
            turn(MessageRole::Agent, Some("Can we confirm March 5th at 10 AM?"), Some(MessageMedium::Voice)),
            turn(MessageRole::User, Some("Yes, confirmed."), Some(MessageMedium::Voice)),
        ];
        assert_eq!(format_transcript(&turns), format_transcript(&turns.clone()));
    }

    #[test]
    fn empty_sequence_renders_empty_string() {
        assert_eq!(format_transcript(&[]), "");
    }
}
