//! Hand arbitration rules.
//!
//! Pure decision functions used by the raise/lower/expire usecases inside a
//! room transaction. Every path uses the same staleness predicate,
//! `now - acquired_at >= timeout`, so the lazy check (claim/release treating a
//! stale hand as free) and the eager check (the scheduled expiry) never
//! disagree.

use handraise_shared::protocol::{EXPIRY_GRACE_MILLIS, RAISE_HAND_TIMEOUT_MILLIS};

use super::{
    entity::HandState,
    value_object::{Timestamp, Username},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandPolicy {
    pub timeout_millis: i64,
    pub expiry_grace_millis: i64,
}

impl Default for HandPolicy {
    fn default() -> Self {
        Self {
            timeout_millis: RAISE_HAND_TIMEOUT_MILLIS,
            expiry_grace_millis: EXPIRY_GRACE_MILLIS,
        }
    }
}

impl HandPolicy {
    /// Whether the hand's timeout has elapsed at `now`.
    ///
    /// A released hand (`acquired_at == 0`) is always stale.
    pub fn is_stale(&self, state: &HandState, now: Timestamp) -> bool {
        now.value() - state.acquired_at.value() >= self.timeout_millis
    }

    pub fn is_free(&self, current: Option<&HandState>, now: Timestamp) -> bool {
        match current {
            None => true,
            Some(state) => state.is_released() || self.is_stale(state, now),
        }
    }

    /// New state when `requester` raises the hand at `now`, or `None` when the
    /// hand is held (by anyone, the requester included) and not stale.
    pub fn claim(
        &self,
        current: Option<&HandState>,
        requester: &Username,
        now: Timestamp,
    ) -> Option<HandState> {
        if self.is_free(current, now) {
            Some(HandState::raised(requester.clone(), now))
        } else {
            None
        }
    }

    /// New state when `requester` lowers the hand at `now`, or `None` when
    /// nobody holds it, someone else does, or the requester's hold already
    /// expired.
    pub fn release(
        &self,
        current: Option<&HandState>,
        requester: &Username,
        now: Timestamp,
    ) -> Option<HandState> {
        let state = current?;
        if &state.holder == requester && !self.is_stale(state, now) {
            Some(HandState::released(requester.clone()))
        } else {
            None
        }
    }

    /// New state when the scheduled expiry check runs at `now`.
    ///
    /// Only a raised hand whose timeout has elapsed is released; the holder is
    /// preserved.
    pub fn expire(&self, current: Option<&HandState>, now: Timestamp) -> Option<HandState> {
        let state = current?;
        if !state.is_released() && self.is_stale(state, now) {
            Some(HandState::released(state.holder.clone()))
        } else {
            None
        }
    }

    /// When the expiry check for a hand raised at `raised_at` must fire.
    pub fn expiry_check_at(&self, raised_at: Timestamp) -> Timestamp {
        Timestamp::new(raised_at.value() + self.timeout_millis + self.expiry_grace_millis)
    }
}
