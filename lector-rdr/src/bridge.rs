//! Extension shell messaging
//!
//! The icon-click relay talks to the page in a two-message protocol:
//! `{"action": "toggle"}` flips widget visibility, and
//! `{"action": "getStatus"}` expects a synchronous status payload.

use serde::{Deserialize, Serialize};

/// Inbound message from the extension shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ShellMessage {
    /// Toggle widget visibility
    Toggle,
    /// Report current selection/playback status
    GetStatus,
}

/// Synchronous reply to [`ShellMessage::GetStatus`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReply {
    pub status: String,
    pub playing: bool,
    pub paused: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_message_wire_format() {
        let toggle: ShellMessage = serde_json::from_str(r#"{"action":"toggle"}"#).unwrap();
        assert_eq!(toggle, ShellMessage::Toggle);

        let status: ShellMessage = serde_json::from_str(r#"{"action":"getStatus"}"#).unwrap();
        assert_eq!(status, ShellMessage::GetStatus);
    }

    #[test]
    fn test_status_reply_round_trip() {
        let reply = StatusReply {
            status: "Selected: hello".to_string(),
            playing: true,
            paused: false,
        };
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(
            json,
            r#"{"status":"Selected: hello","playing":true,"paused":false}"#
        );
    }
}
