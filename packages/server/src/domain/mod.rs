//! Domain layer: value objects, entities, the hand arbitration rules and the
//! interfaces of the collaborators the server depends on.

pub mod alarm;
pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod policy;
pub mod repository;
pub mod value_object;

pub use alarm::AlarmScheduler;
pub use entity::{HandState, Member};
pub use error::{MessagePushError, RepositoryError, RoomIdError};
pub use message_pusher::{MessagePusher, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use policy::HandPolicy;
pub use repository::{HandStateRepository, HandStateTransaction, MemberRepository};
pub use value_object::{ConnectionId, RoomId, Timestamp, Username};
