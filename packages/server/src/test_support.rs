//! Test doubles and fixtures shared by the unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use handraise_shared::{protocol::ServerMessage, time::ManualClock};
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{
        AlarmScheduler, ConnectionId, MemberRepository, MessagePusher, RoomId, Timestamp,
        Username,
    },
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryHandStateRepository, InMemoryMemberRepository},
    },
    usecase::RoomBroadcaster,
};

pub const T0: i64 = 1_700_000_000_000;

pub fn room(name: &str) -> RoomId {
    RoomId::new(name.to_string()).unwrap()
}

/// Scheduler that only records what was scheduled
#[derive(Default)]
pub struct RecordingScheduler {
    scheduled: Mutex<Vec<(RoomId, Timestamp)>>,
}

impl RecordingScheduler {
    pub async fn scheduled(&self) -> Vec<(RoomId, Timestamp)> {
        self.scheduled.lock().await.clone()
    }

    /// Latest alarm scheduled for the room
    pub async fn pending(&self, room_id: &RoomId) -> Option<Timestamp> {
        let scheduled = self.scheduled.lock().await;
        scheduled
            .iter()
            .rev()
            .find(|(id, _)| id == room_id)
            .map(|(_, at)| *at)
    }
}

#[async_trait]
impl AlarmScheduler for RecordingScheduler {
    async fn schedule(&self, room_id: RoomId, at: Timestamp) {
        self.scheduled.lock().await.push((room_id, at));
    }
}

/// In-memory server wiring with a manual clock and observable connections
pub struct Fixture {
    pub clock: Arc<ManualClock>,
    pub scheduler: Arc<RecordingScheduler>,
    pub hand_states: Arc<InMemoryHandStateRepository>,
    pub members: Arc<InMemoryMemberRepository>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub broadcaster: Arc<RoomBroadcaster>,
}

impl Fixture {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new(T0));
        let scheduler = Arc::new(RecordingScheduler::default());
        let hand_states = Arc::new(InMemoryHandStateRepository::new(scheduler.clone()));
        let members = Arc::new(InMemoryMemberRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let broadcaster = Arc::new(RoomBroadcaster::new(
            members.clone(),
            hand_states.clone(),
            pusher.clone(),
        ));
        Self {
            clock,
            scheduler,
            hand_states,
            members,
            pusher,
            broadcaster,
        }
    }

    /// Register a connection directly, without broadcasting
    pub async fn connect(
        &self,
        room_id: &RoomId,
        username: &str,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection_id = ConnectionId::generate();
        self.members
            .add_member(
                room_id,
                connection_id,
                Username::from(username),
                Timestamp::new(T0),
            )
            .await;
        self.pusher.register_client(connection_id, tx).await;
        (connection_id, rx)
    }
}

/// Every message currently queued on a connection
pub fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<ServerMessage> {
    let mut messages = Vec::new();
    while let Ok(text) = rx.try_recv() {
        messages.push(ServerMessage::from_json(&text).unwrap());
    }
    messages
}
