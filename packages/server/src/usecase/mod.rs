//! UseCase 層
//!
//! ドメイン層の trait にのみ依存し、コアのフロー（参加・送信・配信・退出）と
//! セッション/ルームの周辺フローを実装します。

mod broadcast_message;
mod error;
mod join_room;
mod leave_room;
mod room;
mod send_message;
mod session;

pub use broadcast_message::{BroadcastHandle, BroadcastReport, BroadcastWorker, MessageChannel};
pub use error::{JoinRoomError, RoomError, SendMessageError, SessionError};
pub use join_room::{JoinRoomUseCase, JoinTicket};
pub use leave_room::LeaveRoomUseCase;
pub use room::{CreateRoomUseCase, EnterRoomUseCase};
pub use send_message::SendMessageUseCase;
pub use session::{GetProfileUseCase, SignInUseCase, SignOutUseCase};
