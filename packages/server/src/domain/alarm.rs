//! Per-room scheduled wake-ups.

use async_trait::async_trait;

use super::value_object::{RoomId, Timestamp};

/// Alarm substrate used for the hand expiry check.
///
/// A room has at most one pending alarm: scheduling again replaces it. When
/// an alarm fires the room's expiry check runs once.
#[async_trait]
pub trait AlarmScheduler: Send + Sync {
    async fn schedule(&self, room_id: RoomId, at: Timestamp);
}
