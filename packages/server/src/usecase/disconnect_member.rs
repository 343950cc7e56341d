//! UseCase: メンバー切断処理
//!
//! 切断（正常なクローズ・エラーのどちらでも）したメンバーをルームから外し、
//! 残りのメンバーに一覧を送ります。保持中の挙手は切断では下げられず、期限で下がります。

use std::sync::Arc;

use crate::domain::{ConnectionId, Member, MemberRepository, MessagePusher, RoomId};

use super::broadcaster::RoomBroadcaster;

/// メンバー切断のユースケース
pub struct DisconnectMemberUseCase {
    member_repository: Arc<dyn MemberRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    broadcaster: Arc<RoomBroadcaster>,
}

impl DisconnectMemberUseCase {
    pub fn new(
        member_repository: Arc<dyn MemberRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        broadcaster: Arc<RoomBroadcaster>,
    ) -> Self {
        Self {
            member_repository,
            message_pusher,
            broadcaster,
        }
    }

    /// メンバー切断を実行
    ///
    /// # Returns
    ///
    /// 削除されたメンバー（既に削除済みなら `None`）
    pub async fn execute(&self, room_id: &RoomId, connection_id: &ConnectionId) -> Option<Member> {
        self.message_pusher.unregister_client(connection_id).await;
        let removed = self
            .member_repository
            .remove_member(room_id, connection_id)
            .await;

        match &removed {
            Some(member) => tracing::info!(
                "'{}' left room '{}' (connection '{}')",
                member.username,
                room_id,
                connection_id
            ),
            None => tracing::warn!(
                "Connection '{}' was not registered in room '{}'",
                connection_id,
                room_id
            ),
        }

        if let Err(e) = self.broadcaster.broadcast_members(room_id).await {
            tracing::warn!("Failed to broadcast user list for room '{}': {}", room_id, e);
        }

        removed
    }
}
