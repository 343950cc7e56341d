//! UseCase: ルーム一覧取得

use std::sync::Arc;

use crate::domain::{Member, MemberRepository, RoomId};

/// A room with at least one open connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub members: Vec<Member>,
}

pub struct GetRoomsUseCase {
    member_repository: Arc<dyn MemberRepository>,
}

impl GetRoomsUseCase {
    pub fn new(member_repository: Arc<dyn MemberRepository>) -> Self {
        Self { member_repository }
    }

    /// 接続中のメンバーがいるルームを ID 順に返す
    pub async fn execute(&self) -> Vec<RoomSummary> {
        let mut rooms = Vec::new();
        for room_id in self.member_repository.room_ids().await {
            let members = self.member_repository.snapshot(&room_id).await;
            if members.is_empty() {
                continue;
            }
            rooms.push(RoomSummary { room_id, members });
        }
        rooms
    }
}
