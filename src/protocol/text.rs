//! Server-side line formatting
//!
//! All strings a session ever writes are produced here, so the wire format
//! lives in one place and the tests can pin it down exactly.
//!
//! Everything is a finished wire string, terminator included; the formatted
//! chat line and the join/leave notices go to history and to the socket
//! byte-for-byte identical. The two prompts are the only strings with no
//! terminator at all.

use std::time::Duration;

/// Line terminator for everything the server emits
pub const CRLF: &str = "\r\n";

/// Greeting sent as soon as a connection is accepted
pub const WELCOME: &str = "Welcome to the Persistent Group Chat Server!\r\n";

/// Prompt for the user identifier (no trailing newline)
pub const USER_PROMPT: &str = "Enter your user id: ";

/// Prompt for the group identifier (no trailing newline)
pub const GROUP_PROMPT: &str = "Enter group id to join (e.g., group1): ";

/// Farewell sent in response to the quit command
pub const GOODBYE: &str = "Goodbye!\r\n";

/// Control token that ends a session, matched case-insensitively
pub const QUIT_COMMAND: &str = "/quit";

/// Check whether a chat line is the quit command
pub fn is_quit(line: &str) -> bool {
    line.eq_ignore_ascii_case(QUIT_COMMAND)
}

/// Format a relayed chat line: `[<group>] <user>: <body>\r\n`
pub fn chat_line(group_id: &str, user_id: &str, body: &str) -> String {
    format!("[{}] {}: {}{}", group_id, user_id, body, CRLF)
}

/// Notice broadcast to a group when a member joins (not persisted)
pub fn joined_notice(user_id: &str) -> String {
    format!("[Server] {} has joined the group.{}", user_id, CRLF)
}

/// Notice broadcast to a group when a member leaves (not persisted)
pub fn left_notice(user_id: &str) -> String {
    format!("[Server] {} has left the group.{}", user_id, CRLF)
}

/// Confirmation block sent right after a successful handshake
pub fn join_confirmation(group_id: &str, user_id: &str) -> String {
    format!(
        "{crlf}You joined group '{group}' as '{user}'.{crlf}\
         Type messages and press Enter to chat.{crlf}\
         Type '{quit}' to leave.{crlf}{crlf}",
        group = group_id,
        user = user_id,
        quit = QUIT_COMMAND,
        crlf = CRLF,
    )
}

/// Header line preceding a history replay
pub fn replay_header(group_id: &str, ttl: Duration) -> String {
    format!(
        "--- Messages in group '{}' from last {} minutes ---{}",
        group_id,
        ttl_minutes(ttl),
        CRLF
    )
}

/// Closing line of a history replay
pub fn replay_footer() -> String {
    format!("--- End of recent messages ---{crlf}{crlf}", crlf = CRLF)
}

/// Single line sent when a replay has nothing to show
pub fn replay_empty(ttl: Duration) -> String {
    format!(
        "(No messages in this group in the last {} minutes.){crlf}{crlf}",
        ttl_minutes(ttl),
        crlf = CRLF,
    )
}

fn ttl_minutes(ttl: Duration) -> u64 {
    (ttl.as_secs() / 60).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_line_format() {
        assert_eq!(
            chat_line("group1", "alice", "hello"),
            "[group1] alice: hello\r\n"
        );
    }

    #[test]
    fn test_quit_is_case_insensitive() {
        assert!(is_quit("/quit"));
        assert!(is_quit("/QUIT"));
        assert!(is_quit("/Quit"));
        assert!(!is_quit("/quit now"));
        assert!(!is_quit("quit"));
    }

    #[test]
    fn test_join_confirmation_mentions_ids() {
        let block = join_confirmation("group1", "alice");
        assert!(block.starts_with("\r\n"));
        assert!(block.contains("You joined group 'group1' as 'alice'.\r\n"));
        assert!(block.contains("Type '/quit' to leave.\r\n"));
        assert!(block.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_notices_are_complete_lines() {
        assert_eq!(joined_notice("bob"), "[Server] bob has joined the group.\r\n");
        assert_eq!(left_notice("bob"), "[Server] bob has left the group.\r\n");
    }

    #[test]
    fn test_replay_bracket_default_ttl() {
        let ttl = Duration::from_secs(900);
        assert_eq!(
            replay_header("group1", ttl),
            "--- Messages in group 'group1' from last 15 minutes ---\r\n"
        );
        assert_eq!(replay_footer(), "--- End of recent messages ---\r\n\r\n");
        assert_eq!(
            replay_empty(ttl),
            "(No messages in this group in the last 15 minutes.)\r\n\r\n"
        );
    }

    #[test]
    fn test_subminute_ttl_rounds_up_to_one() {
        let header = replay_header("g", Duration::from_secs(5));
        assert!(header.contains("last 1 minutes"));
    }
}
