//! Server state shared by the handlers.

use std::sync::Arc;

use crate::usecase::{
    ConnectMemberUseCase, DisconnectMemberUseCase, GetRoomStateUseCase, GetRoomsUseCase,
    LowerHandUseCase, RaiseHandUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectMemberUseCase（メンバー接続のユースケース）
    pub connect_member_usecase: Arc<ConnectMemberUseCase>,
    /// DisconnectMemberUseCase（メンバー切断のユースケース）
    pub disconnect_member_usecase: Arc<DisconnectMemberUseCase>,
    /// RaiseHandUseCase（挙手のユースケース）
    pub raise_hand_usecase: Arc<RaiseHandUseCase>,
    /// LowerHandUseCase（手を下げるユースケース）
    pub lower_hand_usecase: Arc<LowerHandUseCase>,
    pub get_room_state_usecase: Arc<GetRoomStateUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
}
