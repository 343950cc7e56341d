//! Client-side room state.

use handraise_shared::protocol::{HandState, RAISE_HAND_TIMEOUT_MILLIS, User};

use crate::{
    color::Rgb,
    countdown::{ClockSkew, remaining_millis},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberView {
    pub username: String,
    pub color: Rgb,
}

impl From<User> for MemberView {
    fn from(user: User) -> Self {
        let color = Rgb::from_username(&user.username);
        Self {
            username: user.username,
            color,
        }
    }
}

/// How an inbound hand state differs from the one already shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandChange {
    /// Same holder and timestamp as before
    Unchanged,
    Raised,
    /// Released while the local countdown was still running
    Lowered,
    /// Released after the local countdown ran out
    Expired,
    /// Released with no hold shown before, e.g. right after joining
    Idle,
}

/// Everything the terminal shows about the joined room
#[derive(Debug, Clone)]
pub struct ClientView {
    pub room_id: String,
    pub username: String,
    pub members: Vec<MemberView>,
    pub hand_state: Option<HandState>,
    pub in_room: bool,
    skew: Option<ClockSkew>,
}

impl ClientView {
    pub fn new(room_id: String, username: String) -> Self {
        Self {
            room_id,
            username,
            members: Vec::new(),
            hand_state: None,
            in_room: false,
            skew: None,
        }
    }

    /// Replace the member list wholesale.
    pub fn set_members(&mut self, users: Vec<User>) {
        self.members = users.into_iter().map(MemberView::from).collect();
    }

    /// Replace the hand state and re-capture the skew against `local_now`.
    ///
    /// The change is classified against the previous state before the skew
    /// moves.
    pub fn set_hand_state(&mut self, hand_state: HandState, local_now: i64) -> HandChange {
        let change = match self.hand_state.as_ref() {
            Some(previous) if *previous == hand_state => HandChange::Unchanged,
            _ if hand_state.is_raised() => HandChange::Raised,
            Some(previous) if previous.is_raised() => {
                if self.remaining_millis(local_now).is_some() {
                    HandChange::Lowered
                } else {
                    HandChange::Expired
                }
            }
            _ => HandChange::Idle,
        };

        self.skew = Some(ClockSkew::capture(
            hand_state.timestamp_milliseconds,
            local_now,
        ));
        self.hand_state = Some(hand_state);
        change
    }

    pub fn skew(&self) -> Option<ClockSkew> {
        self.skew
    }

    pub fn is_anyone_holding(&self) -> bool {
        self.hand_state.as_ref().is_some_and(HandState::is_raised)
    }

    pub fn is_current_user_holding(&self) -> bool {
        self.hand_state
            .as_ref()
            .is_some_and(|s| s.is_raised() && s.username == self.username)
    }

    /// Name of the member holding the hand, if anyone is.
    pub fn holder(&self) -> Option<&str> {
        self.hand_state
            .as_ref()
            .filter(|s| s.is_raised())
            .map(|s| s.username.as_str())
    }

    pub fn color_of(&self, username: &str) -> Rgb {
        self.members
            .iter()
            .find(|m| m.username == username)
            .map(|m| m.color)
            .unwrap_or_else(|| Rgb::from_username(username))
    }

    /// Remaining hold in milliseconds, measured on the local clock.
    pub fn remaining_millis(&self, now_local: i64) -> Option<i64> {
        let state = self.hand_state.as_ref()?;
        let skew = self.skew?;
        remaining_millis(
            state.timestamp_milliseconds,
            skew.captured_local(),
            now_local,
            RAISE_HAND_TIMEOUT_MILLIS,
        )
    }
}
