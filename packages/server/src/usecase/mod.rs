//! UseCase layer: the Token Arbiter operations, membership changes, room
//! broadcasts and read-only room views.

mod broadcaster;
mod connect_member;
mod disconnect_member;
mod error;
mod expire_hand;
mod get_room_state;
mod get_rooms;
mod lower_hand;
mod message;
mod raise_hand;

pub use broadcaster::RoomBroadcaster;
pub use connect_member::ConnectMemberUseCase;
pub use disconnect_member::DisconnectMemberUseCase;
pub use error::{ArbiterError, BroadcastError, GetRoomStateError};
pub use expire_hand::{ExpireHandUseCase, run_alarm_loop};
pub use get_room_state::{GetRoomStateUseCase, RoomState};
pub use get_rooms::{GetRoomsUseCase, RoomSummary};
pub use lower_hand::LowerHandUseCase;
pub use raise_hand::RaiseHandUseCase;
