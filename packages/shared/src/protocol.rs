//! WebSocket wire protocol shared by server and client.
//!
//! Every message is a JSON object discriminated by its `type` field.
//!
//! Client → server:
//!
//! ```text
//! {"type":"raise-hand"}
//! {"type":"lower-hand"}
//! ```
//!
//! Server → client:
//!
//! ```text
//! {"type":"user-list","payload":{"users":[{"username":"alice"}]}}
//! {"type":"broadcast-raise-hand","payload":{"username":"alice","timestampMilliseconds":1700000000000}}
//! ```

use serde::{Deserialize, Serialize};

/// How long a raised hand stays raised unless lowered earlier.
pub const RAISE_HAND_TIMEOUT_MILLIS: i64 = 5_000;

/// Delay added on top of the timeout before the server's expiry check fires,
/// so the check never lands before the timeout boundary.
pub const EXPIRY_GRACE_MILLIS: i64 = 250;

/// Client-side countdown refresh interval.
pub const COUNTDOWN_POLL_INTERVAL_MILLIS: u64 = 50;

/// `timestampMilliseconds` value meaning "nobody is raising a hand".
pub const RELEASED_TIMESTAMP: i64 = 0;

/// Messages sent from a client to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    RaiseHand,
    LowerHand,
}

/// Messages sent from the server to every connection in a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ServerMessage {
    UserList(UserListPayload),
    BroadcastRaiseHand(HandState),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListPayload {
    pub users: Vec<User>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
}

/// Current holder of the room's hand.
///
/// `timestamp_milliseconds == RELEASED_TIMESTAMP` encodes "released"; the
/// `username` is then only the last holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandState {
    pub username: String,
    pub timestamp_milliseconds: i64,
}

impl HandState {
    pub fn is_raised(&self) -> bool {
        self.timestamp_milliseconds != RELEASED_TIMESTAMP
    }
}

impl ClientMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl ServerMessage {
    pub fn user_list(usernames: impl IntoIterator<Item = String>) -> Self {
        Self::UserList(UserListPayload {
            users: usernames
                .into_iter()
                .map(|username| User { username })
                .collect(),
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
