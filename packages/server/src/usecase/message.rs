//! Server messages built from committed room state.

use handraise_shared::protocol;

use crate::domain::entity;

impl From<entity::HandState> for protocol::HandState {
    fn from(model: entity::HandState) -> Self {
        Self {
            username: model.holder.into_string(),
            timestamp_milliseconds: model.acquired_at.value(),
        }
    }
}

impl From<entity::Member> for protocol::User {
    fn from(model: entity::Member) -> Self {
        Self {
            username: model.username.into_string(),
        }
    }
}

/// Build the `user-list` message for a member snapshot
pub fn user_list_message(members: Vec<entity::Member>) -> protocol::ServerMessage {
    protocol::ServerMessage::UserList(protocol::UserListPayload {
        users: members.into_iter().map(Into::into).collect(),
    })
}

/// Build the `broadcast-raise-hand` message for a hand state
pub fn hand_state_message(state: entity::HandState) -> protocol::ServerMessage {
    protocol::ServerMessage::BroadcastRaiseHand(state.into())
}
