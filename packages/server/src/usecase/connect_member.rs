//! UseCase: メンバー接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectMemberUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 接続した全員に最新のメンバー一覧が届くことを保証する
//! - 後から接続したメンバーにも現在の挙手状態が届くことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規メンバーの接続
//! - エッジケース：同じ表示名の接続、挙手されたことのないルーム

use std::sync::Arc;

use handraise_shared::time::Clock;

use crate::domain::{
    ConnectionId, MemberRepository, MessagePusher, PusherChannel, RoomId, Timestamp, Username,
};

use super::broadcaster::RoomBroadcaster;

/// メンバー接続のユースケース
pub struct ConnectMemberUseCase {
    member_repository: Arc<dyn MemberRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    broadcaster: Arc<RoomBroadcaster>,
    clock: Arc<dyn Clock>,
}

impl ConnectMemberUseCase {
    pub fn new(
        member_repository: Arc<dyn MemberRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        broadcaster: Arc<RoomBroadcaster>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            member_repository,
            message_pusher,
            broadcaster,
            clock,
        }
    }

    /// メンバー接続を実行
    ///
    /// 接続を登録し、ルームの全員にメンバー一覧を、続けて現在の挙手状態を送ります。
    ///
    /// # Returns
    ///
    /// 新しい接続の ID
    pub async fn execute(
        &self,
        room_id: &RoomId,
        username: Username,
        sender: PusherChannel,
    ) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        let connected_at = Timestamp::new(self.clock.now_millis());

        self.message_pusher
            .register_client(connection_id, sender)
            .await;
        self.member_repository
            .add_member(room_id, connection_id, username.clone(), connected_at)
            .await;
        tracing::info!(
            "'{}' joined room '{}' (connection '{}')",
            username,
            room_id,
            connection_id
        );

        if let Err(e) = self.broadcaster.broadcast_members(room_id).await {
            tracing::warn!("Failed to broadcast user list for room '{}': {}", room_id, e);
        }
        if let Err(e) = self.broadcaster.broadcast_hand_state(room_id).await {
            tracing::warn!("Failed to broadcast hand state for room '{}': {}", room_id, e);
        }

        connection_id
    }
}
