//! InMemory Member Repository 実装
//!
//! ルームごとの接続リストを保持します。最後の接続が切れたルームのエントリは削除されます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, Member, MemberRepository, RoomId, Timestamp, Username};

/// インメモリ Member Repository 実装
#[derive(Default)]
pub struct InMemoryMemberRepository {
    rooms: Mutex<HashMap<RoomId, Vec<Member>>>,
}

impl InMemoryMemberRepository {
    /// 新しい InMemoryMemberRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn add_member(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        username: Username,
        connected_at: Timestamp,
    ) {
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(room_id.clone())
            .or_default()
            .push(Member::new(connection_id, username, connected_at));
    }

    async fn remove_member(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<Member> {
        let mut rooms = self.rooms.lock().await;
        let members = rooms.get_mut(room_id)?;
        let index = members
            .iter()
            .position(|m| &m.connection_id == connection_id)?;
        let removed = members.remove(index);
        if members.is_empty() {
            rooms.remove(room_id);
        }
        Some(removed)
    }

    async fn snapshot(&self, room_id: &RoomId) -> Vec<Member> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned().unwrap_or_default()
    }

    async fn connection_ids(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(|members| members.iter().map(|m| m.connection_id).collect())
            .unwrap_or_default()
    }

    async fn room_ids(&self) -> Vec<RoomId> {
        let rooms = self.rooms.lock().await;
        let mut ids: Vec<RoomId> = rooms.keys().cloned().collect();
        ids.sort();
        ids
    }
}
