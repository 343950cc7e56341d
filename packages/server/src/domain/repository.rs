//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    entity::{HandState, Member},
    error::RepositoryError,
    value_object::{ConnectionId, RoomId, Timestamp, Username},
};

/// Hand state storage with per-room transactions.
///
/// At most one `HandState` is stored per room. Every read-modify-write goes
/// through [`HandStateRepository::begin`]; transactions on the same room are
/// serialized, so two claims can never both observe a free hand.
#[async_trait]
pub trait HandStateRepository: Send + Sync {
    /// Start a transaction on `room_id`, waiting for any transaction already
    /// open on that room to finish.
    async fn begin(
        &self,
        room_id: &RoomId,
    ) -> Result<Box<dyn HandStateTransaction>, RepositoryError>;

    /// Read the last committed state without opening a transaction.
    async fn load(&self, room_id: &RoomId) -> Result<Option<HandState>, RepositoryError>;
}

/// An open transaction on one room.
///
/// Writes and the alarm are staged and only take effect together on
/// [`HandStateTransaction::commit`]; dropping the transaction discards them.
#[async_trait]
pub trait HandStateTransaction: Send {
    /// The state as seen by this transaction, staged writes included.
    fn get(&self) -> Option<HandState>;

    fn put(&mut self, state: HandState);

    /// Arm the room's expiry check at `at`, replacing any pending one.
    fn set_alarm(&mut self, at: Timestamp);

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;
}

/// Live connections per room.
///
/// Never persisted; the member list is recomputed from it whenever needed.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn add_member(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        username: Username,
        connected_at: Timestamp,
    );

    /// Remove a connection, returning it when it was registered.
    async fn remove_member(&self, room_id: &RoomId, connection_id: &ConnectionId)
    -> Option<Member>;

    /// Current members in connection order, duplicates included.
    async fn snapshot(&self, room_id: &RoomId) -> Vec<Member>;

    async fn connection_ids(&self, room_id: &RoomId) -> Vec<ConnectionId>;

    /// Rooms with at least one open connection.
    async fn room_ids(&self) -> Vec<RoomId>;
}
