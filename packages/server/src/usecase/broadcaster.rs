//! Room Broadcaster
//!
//! Serializes the current member list or hand state of a room and pushes it to
//! every open connection in that room. Reads committed state only, after the
//! triggering transaction has finished. Delivery is best effort: at most once
//! per triggering event, no retry, no acknowledgement.

use std::sync::Arc;

use crate::domain::{HandStateRepository, MemberRepository, MessagePusher, RoomId};

use super::{
    error::BroadcastError,
    message::{hand_state_message, user_list_message},
};

pub struct RoomBroadcaster {
    member_repository: Arc<dyn MemberRepository>,
    hand_state_repository: Arc<dyn HandStateRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RoomBroadcaster {
    pub fn new(
        member_repository: Arc<dyn MemberRepository>,
        hand_state_repository: Arc<dyn HandStateRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            member_repository,
            hand_state_repository,
            message_pusher,
        }
    }

    /// Push the room's `user-list` to every connection in the room.
    pub async fn broadcast_members(&self, room_id: &RoomId) -> Result<(), BroadcastError> {
        let members = self.member_repository.snapshot(room_id).await;
        let targets: Vec<_> = members.iter().map(|m| m.connection_id).collect();
        let json = user_list_message(members).to_json()?;

        tracing::info!(
            "Broadcasting user list to {} connection(s) in room '{}'",
            targets.len(),
            room_id
        );
        self.message_pusher.broadcast(targets, &json).await?;
        Ok(())
    }

    /// Push the room's `broadcast-raise-hand` to every connection in the room.
    ///
    /// Nothing is sent while the room has never had a hand raised. Returns
    /// whether a message was sent.
    pub async fn broadcast_hand_state(&self, room_id: &RoomId) -> Result<bool, BroadcastError> {
        let Some(state) = self.hand_state_repository.load(room_id).await? else {
            tracing::debug!("Room '{}' has no hand state yet, nothing to broadcast", room_id);
            return Ok(false);
        };
        let json = hand_state_message(state).to_json()?;
        let targets = self.member_repository.connection_ids(room_id).await;

        tracing::info!(
            "Broadcasting hand state to {} connection(s) in room '{}': {}",
            targets.len(),
            room_id,
            json
        );
        self.message_pusher.broadcast(targets, &json).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ConnectionId, HandState, HandStateTransaction, MessagePushError, MockMessagePusher,
            Timestamp, Username,
        },
        infrastructure::repository::{InMemoryHandStateRepository, InMemoryMemberRepository},
        test_support::{RecordingScheduler, room},
    };
    use handraise_shared::protocol::ServerMessage;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - broadcast_members: ルーム内の全接続に user-list が送られる
    // - broadcast_hand_state: 状態が無ければ送らない、あれば全接続に送る
    // - 一部の送信失敗がエラーとして伝播すること
    // ========================================

    struct Repos {
        members: Arc<InMemoryMemberRepository>,
        hand_states: Arc<InMemoryHandStateRepository>,
    }

    fn repos() -> Repos {
        Repos {
            members: Arc::new(InMemoryMemberRepository::new()),
            hand_states: Arc::new(InMemoryHandStateRepository::new(Arc::new(
                RecordingScheduler::default(),
            ))),
        }
    }

    async fn add(repos: &Repos, room_name: &str, name: &str) -> ConnectionId {
        let id = ConnectionId::generate();
        repos
            .members
            .add_member(&room(room_name), id, Username::from(name), Timestamp::new(1))
            .await;
        id
    }

    #[tokio::test]
    async fn test_broadcast_members_targets_only_that_room() {
        // テスト項目: user-list は同じルームの全接続にだけ送られる
        // given (前提条件):
        let repos = repos();
        let alice = add(&repos, "demo", "alice").await;
        let bob = add(&repos, "demo", "bob").await;
        let _other = add(&repos, "elsewhere", "carol").await;

        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(move |targets, content| {
                let message = ServerMessage::from_json(content).unwrap();
                targets == &vec![alice, bob]
                    && message
                        == ServerMessage::user_list(vec!["alice".to_string(), "bob".to_string()])
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let broadcaster =
            RoomBroadcaster::new(repos.members.clone(), repos.hand_states.clone(), Arc::new(pusher));

        // when (操作):
        let result = broadcaster.broadcast_members(&room("demo")).await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_broadcast_hand_state_without_state_sends_nothing() {
        // テスト項目: 一度も挙手されていないルームでは何も送られない
        // given (前提条件):
        let repos = repos();
        add(&repos, "demo", "alice").await;
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().times(0);
        let broadcaster =
            RoomBroadcaster::new(repos.members.clone(), repos.hand_states.clone(), Arc::new(pusher));

        // when (操作):
        let result = broadcaster.broadcast_hand_state(&room("demo")).await;

        // then (期待する結果):
        assert!(matches!(result, Ok(false)));
    }

    #[tokio::test]
    async fn test_broadcast_hand_state_sends_committed_state() {
        // テスト項目: commit 済みの状態が全接続に送られる
        // given (前提条件):
        let repos = repos();
        let alice = add(&repos, "demo", "alice").await;
        let mut txn = repos.hand_states.begin(&room("demo")).await.unwrap();
        txn.put(HandState::raised(Username::from("alice"), Timestamp::new(42)));
        txn.commit().await.unwrap();

        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(move |targets, content| {
                targets == &vec![alice]
                    && content
                        == r#"{"type":"broadcast-raise-hand","payload":{"username":"alice","timestampMilliseconds":42}}"#
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let broadcaster =
            RoomBroadcaster::new(repos.members.clone(), repos.hand_states.clone(), Arc::new(pusher));

        // when (操作):
        let result = broadcaster.broadcast_hand_state(&room("demo")).await;

        // then (期待する結果):
        assert!(matches!(result, Ok(true)));
    }

    #[tokio::test]
    async fn test_broadcast_push_failure_is_reported() {
        // テスト項目: Pusher の失敗は BroadcastError::Push として返される
        // given (前提条件):
        let repos = repos();
        add(&repos, "demo", "alice").await;
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .returning(|_, _| Err(MessagePushError::PushFailed("closed".to_string())));
        let broadcaster =
            RoomBroadcaster::new(repos.members.clone(), repos.hand_states.clone(), Arc::new(pusher));

        // when (操作):
        let result = broadcaster.broadcast_members(&room("demo")).await;

        // then (期待する結果):
        assert!(matches!(result, Err(BroadcastError::Push(_))));
    }
}
