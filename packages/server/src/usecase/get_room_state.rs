//! UseCase: ルーム状態取得
//!
//! HTTP API から特定ルームのメンバーと挙手状態を参照するための読み取り専用ユースケースです。

use std::sync::Arc;

use crate::domain::{HandState, HandStateRepository, Member, MemberRepository, RoomId};

use super::error::GetRoomStateError;

/// A room's members and its last committed hand state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomState {
    pub room_id: RoomId,
    pub members: Vec<Member>,
    pub hand_state: Option<HandState>,
}

pub struct GetRoomStateUseCase {
    member_repository: Arc<dyn MemberRepository>,
    hand_state_repository: Arc<dyn HandStateRepository>,
}

impl GetRoomStateUseCase {
    pub fn new(
        member_repository: Arc<dyn MemberRepository>,
        hand_state_repository: Arc<dyn HandStateRepository>,
    ) -> Self {
        Self {
            member_repository,
            hand_state_repository,
        }
    }

    /// ルーム状態を取得
    ///
    /// メンバーがおらず挙手されたこともないルームは存在しないものとして扱います。
    pub async fn execute(&self, room_id: String) -> Result<RoomState, GetRoomStateError> {
        let room_id = RoomId::new(room_id).map_err(|_| GetRoomStateError::RoomNotFound)?;

        let members = self.member_repository.snapshot(&room_id).await;
        let hand_state = self.hand_state_repository.load(&room_id).await?;

        if members.is_empty() && hand_state.is_none() {
            return Err(GetRoomStateError::RoomNotFound);
        }

        Ok(RoomState {
            room_id,
            members,
            hand_state,
        })
    }
}
