//! UseCase: 期限チェック（onExpiryCheck）
//!
//! 挙手時に登録されたアラームが発火したときに実行されます。保持者が切断したり
//! 手を下げなかったりしても、期限が来れば必ず下げられることを保証します。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ExpireHandUseCase::execute() と run_alarm_loop()
//!
//! ### どのような状況を想定しているか
//! - 正常系：期限切れの挙手が下げられ、全員に送られる
//! - エッジケース：期限前の発火、既に下げられた状態、別の挙手に置き換わった後の発火

use std::sync::Arc;

use handraise_shared::time::Clock;
use tokio::sync::mpsc;

use crate::domain::{HandPolicy, HandStateRepository, RoomId, Timestamp};

use super::{broadcaster::RoomBroadcaster, error::ArbiterError};

/// 期限チェックのユースケース
pub struct ExpireHandUseCase {
    repository: Arc<dyn HandStateRepository>,
    broadcaster: Arc<RoomBroadcaster>,
    clock: Arc<dyn Clock>,
    policy: HandPolicy,
}

impl ExpireHandUseCase {
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

    /// 期限チェックを実行
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 期限切れの挙手を下げた
    /// * `Ok(false)` - 変更なし
    pub async fn execute(&self, room_id: &RoomId) -> Result<bool, ArbiterError> {
        let result = self.expire(room_id).await;

        if let Err(e) = self.broadcaster.broadcast_hand_state(room_id).await {
            tracing::warn!("Failed to broadcast hand state for room '{}': {}", room_id, e);
        }

        result
    }

    async fn expire(&self, room_id: &RoomId) -> Result<bool, ArbiterError> {
        let mut txn = self.repository.begin(room_id).await?;
        let now = Timestamp::new(self.clock.now_millis());

        let Some(next) = self.policy.expire(txn.get().as_ref(), now) else {
            tracing::debug!("Expiry check found nothing to release in room '{}'", room_id);
            return Ok(false);
        };

        let holder = next.holder.clone();
        txn.put(next);
        txn.commit().await?;

        tracing::info!("Hand of '{}' expired in room '{}'", holder, room_id);
        Ok(true)
    }
}

/// Run the expiry check for every fired alarm until the alarm channel closes.
pub async fn run_alarm_loop(
    mut fired: mpsc::UnboundedReceiver<RoomId>,
    usecase: Arc<ExpireHandUseCase>,
) {
    while let Some(room_id) = fired.recv().await {
        if let Err(e) = usecase.execute(&room_id).await {
            tracing::warn!("Expiry check failed for room '{}': {}", room_id, e);
        }
    }
    tracing::info!("Alarm loop stopped");
}
