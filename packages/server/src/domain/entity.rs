//! Entities.

use super::value_object::{ConnectionId, Timestamp, Username};

/// The room's single hand slot.
///
/// `acquired_at == 0` is the released value; `holder` then only records the
/// last holder. The record is overwritten on release, never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandState {
    pub holder: Username,
    pub acquired_at: Timestamp,
}

impl HandState {
    pub const RELEASED_AT: Timestamp = Timestamp::new(0);

    pub fn raised(holder: Username, acquired_at: Timestamp) -> Self {
        Self {
            holder,
            acquired_at,
        }
    }

    pub fn released(holder: Username) -> Self {
        Self {
            holder,
            acquired_at: Self::RELEASED_AT,
        }
    }

    pub fn is_released(&self) -> bool {
        self.acquired_at == Self::RELEASED_AT
    }
}

/// An open connection in a room, as seen by the member list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub connection_id: ConnectionId,
    pub username: Username,
    pub connected_at: Timestamp,
}

impl Member {
    pub fn new(connection_id: ConnectionId, username: Username, connected_at: Timestamp) -> Self {
        Self {
            connection_id,
            username,
            connected_at,
        }
    }
}
