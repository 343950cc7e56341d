//! UseCase: 挙手（claim）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RaiseHandUseCase::execute() メソッド
//! - 相互排他、期限切れ後の再挙手、保持者の再挙手が延長にならないこと
//!
//! ### なぜこのテストが必要か
//! - 同時に届く挙手の競合こそが正しさの要であるため
//! - 拒否された場合も現在の状態が再送され、要求者の表示が実際の状態に揃うことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：空いている状態での挙手
//! - 異常系：他者が保持中の挙手、ストレージ障害
//! - エッジケース：タイムアウト境界、並行する挙手

use std::sync::Arc;

use handraise_shared::time::Clock;

use crate::domain::{HandPolicy, HandStateRepository, RoomId, Timestamp, Username};

use super::{broadcaster::RoomBroadcaster, error::ArbiterError};

/// 挙手のユースケース
pub struct RaiseHandUseCase {
    repository: Arc<dyn HandStateRepository>,
    broadcaster: Arc<RoomBroadcaster>,
    clock: Arc<dyn Clock>,
    policy: HandPolicy,
}

impl RaiseHandUseCase {
    pub fn new(
        repository: Arc<dyn HandStateRepository>,
        broadcaster: Arc<RoomBroadcaster>,
        clock: Arc<dyn Clock>,
        policy: HandPolicy,
    ) -> Self {
        Self {
            repository,
            broadcaster,
            clock,
            policy,
        }
    }

    /// 挙手を実行
    ///
    /// 結果にかかわらず、トランザクション終了後に現在の状態をルームへブロードキャストします。
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 挙手が許可され、期限チェックが登録された
    /// * `Ok(false)` - 他の誰か（または要求者自身）が保持中のため拒否された
    /// * `Err(ArbiterError)` - トランザクションが失敗した（何も commit されていない）
    pub async fn execute(
        &self,
        room_id: &RoomId,
        requester: &Username,
    ) -> Result<bool, ArbiterError> {
        let result = self.claim(room_id, requester).await;

        if let Err(e) = self.broadcaster.broadcast_hand_state(room_id).await {
            tracing::warn!("Failed to broadcast hand state for room '{}': {}", room_id, e);
        }

        result
    }

    async fn claim(&self, room_id: &RoomId, requester: &Username) -> Result<bool, ArbiterError> {
        let mut txn = self.repository.begin(room_id).await?;
        let now = Timestamp::new(self.clock.now_millis());

        let Some(next) = self.policy.claim(txn.get().as_ref(), requester, now) else {
            tracing::info!("Raise hand denied for '{}' in room '{}'", requester, room_id);
            return Ok(false);
        };

        txn.put(next);
        txn.set_alarm(self.policy.expiry_check_at(now));
        txn.commit().await?;

        tracing::info!("Raise hand granted to '{}' in room '{}'", requester, room_id);
        Ok(true)
    }
}
