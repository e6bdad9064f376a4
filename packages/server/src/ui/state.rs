//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    CreateRoomUseCase, EnterRoomUseCase, GetProfileUseCase, JoinRoomUseCase, LeaveRoomUseCase,
    SendMessageUseCase, SignInUseCase, SignOutUseCase,
};

/// Use cases reachable from the handlers
pub struct AppState {
    /// JoinRoomUseCase（WebSocket 接続時の参加処理）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// SendMessageUseCase（受信メッセージを Message Channel へ）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// LeaveRoomUseCase（接続終了時の解除）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub sign_in_usecase: Arc<SignInUseCase>,
    pub sign_out_usecase: Arc<SignOutUseCase>,
    pub get_profile_usecase: Arc<GetProfileUseCase>,
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub enter_room_usecase: Arc<EnterRoomUseCase>,
}
