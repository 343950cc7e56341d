//! UseCase: 手を下げる（release）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LowerHandUseCase::execute() メソッド
//! - 保持者だけが、期限内に限り手を下げられること
//!
//! ### どのような状況を想定しているか
//! - 正常系：保持者による下げ
//! - 異常系：保持者以外による下げ、二重の下げ
//! - エッジケース：期限切れ後の遅れた下げ（エラーではなく何もしない）

use std::sync::Arc;

use handraise_shared::time::Clock;

use crate::domain::{HandPolicy, HandStateRepository, RoomId, Timestamp, Username};

use super::{broadcaster::RoomBroadcaster, error::ArbiterError};

/// 手を下げるユースケース
pub struct LowerHandUseCase {
    repository: Arc<dyn HandStateRepository>,
    broadcaster: Arc<RoomBroadcaster>,
    clock: Arc<dyn Clock>,
    policy: HandPolicy,
}

impl LowerHandUseCase {
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

    /// 手を下げる処理を実行
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 下げた
    /// * `Ok(false)` - 誰も保持していない、他者が保持している、または期限切れ
    /// * `Err(ArbiterError)` - トランザクションが失敗した
    pub async fn execute(
        &self,
        room_id: &RoomId,
        requester: &Username,
    ) -> Result<bool, ArbiterError> {
        let result = self.release(room_id, requester).await;

        if let Err(e) = self.broadcaster.broadcast_hand_state(room_id).await {
            tracing::warn!("Failed to broadcast hand state for room '{}': {}", room_id, e);
        }

        result
    }

    async fn release(&self, room_id: &RoomId, requester: &Username) -> Result<bool, ArbiterError> {
        let mut txn = self.repository.begin(room_id).await?;
        let now = Timestamp::new(self.clock.now_millis());

        let Some(next) = self.policy.release(txn.get().as_ref(), requester, now) else {
            tracing::info!("Lower hand ignored for '{}' in room '{}'", requester, room_id);
            return Ok(false);
        };

        txn.put(next);
        txn.commit().await?;

        tracing::info!("Hand lowered by '{}' in room '{}'", requester, room_id);
        Ok(true)
    }
}
