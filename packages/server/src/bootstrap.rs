//! Dependency wiring.

use std::sync::Arc;

use handraise_shared::time::Clock;

use crate::{
    domain::HandPolicy,
    infrastructure::{
        alarm::TokioAlarmScheduler,
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryHandStateRepository, InMemoryMemberRepository},
    },
    ui::Server,
    usecase::{
        ConnectMemberUseCase, DisconnectMemberUseCase, ExpireHandUseCase, GetRoomStateUseCase,
        GetRoomsUseCase, LowerHandUseCase, RaiseHandUseCase, RoomBroadcaster,
    },
};

/// Build a server backed by in-memory storage and tokio alarms.
pub fn build_server(clock: Arc<dyn Clock>) -> Server {
    // Initialize dependencies in order:
    // 1. Alarm scheduler and repositories
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server
    let (scheduler, fired_alarms) = TokioAlarmScheduler::new(clock.clone());
    let hand_states = Arc::new(InMemoryHandStateRepository::new(Arc::new(scheduler)));
    let members = Arc::new(InMemoryMemberRepository::new());

    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    let policy = HandPolicy::default();
    let broadcaster = Arc::new(RoomBroadcaster::new(
        members.clone(),
        hand_states.clone(),
        message_pusher.clone(),
    ));
    let connect_member_usecase = Arc::new(ConnectMemberUseCase::new(
        members.clone(),
        message_pusher.clone(),
        broadcaster.clone(),
        clock.clone(),
    ));
    let disconnect_member_usecase = Arc::new(DisconnectMemberUseCase::new(
        members.clone(),
        message_pusher.clone(),
        broadcaster.clone(),
    ));
    let raise_hand_usecase = Arc::new(RaiseHandUseCase::new(
        hand_states.clone(),
        broadcaster.clone(),
        clock.clone(),
        policy,
    ));
    let lower_hand_usecase = Arc::new(LowerHandUseCase::new(
        hand_states.clone(),
        broadcaster.clone(),
        clock.clone(),
        policy,
    ));
    let expire_hand_usecase = Arc::new(ExpireHandUseCase::new(
        hand_states.clone(),
        broadcaster,
        clock,
        policy,
    ));
    let get_room_state_usecase = Arc::new(GetRoomStateUseCase::new(
        members.clone(),
        hand_states,
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(members));

    Server::new(
        connect_member_usecase,
        disconnect_member_usecase,
        raise_hand_usecase,
        lower_hand_usecase,
        expire_hand_usecase,
        get_room_state_usecase,
        get_rooms_usecase,
        fired_alarms,
    )
}
