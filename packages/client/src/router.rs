//! Client Message Router
//!
//! Decodes server messages into view updates and encodes the user's intents.

use handraise_shared::protocol::{ClientMessage, ServerMessage};

use crate::{
    error::ClientError,
    view::{ClientView, HandChange},
};

/// What part of the view an inbound message replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewUpdate {
    Members,
    HandState(HandChange),
}

pub struct ClientMessageRouter;

impl ClientMessageRouter {
    /// Apply one inbound text frame to `view`.
    ///
    /// Returns `None` when the frame is not a known server message; the view
    /// is left untouched in that case.
    pub fn route(view: &mut ClientView, text: &str, local_now: i64) -> Option<ViewUpdate> {
        let message = match ServerMessage::from_json(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Ignoring undecodable server message: {} ({})", text, e);
                return None;
            }
        };

        match message {
            ServerMessage::UserList(payload) => {
                view.set_members(payload.users);
                Some(ViewUpdate::Members)
            }
            ServerMessage::BroadcastRaiseHand(hand_state) => {
                let change = view.set_hand_state(hand_state, local_now);
                Some(ViewUpdate::HandState(change))
            }
        }
    }

    pub fn raise_hand() -> Result<String, ClientError> {
        Ok(ClientMessage::RaiseHand.to_json()?)
    }

    pub fn lower_hand() -> Result<String, ClientError> {
        Ok(ClientMessage::LowerHand.to_json()?)
    }
}
