//! UseCase 層
//!
//! 受信イベントを Registry 操作と配送指示に変換するレイヤー（ルーティングの中核）。
//! UI 層（ゲートウェイ）から呼び出され、Domain 層を操作します。
//! 自身は状態を持たず、配送先の決定のみを行います。実際のフレーム送信は
//! ゲートウェイの責務です。

pub mod connect_participant;
pub mod direct_message;
pub mod disconnect_participant;
pub mod error;
pub mod join_room;
pub mod room_message;

pub use connect_participant::ConnectParticipantUseCase;
pub use direct_message::{DirectDelivery, DirectMessageUseCase};
pub use disconnect_participant::{DepartureNotice, DisconnectParticipantUseCase};
pub use error::{ConnectError, JoinError, SendError};
pub use join_room::{JoinNotice, JoinRoomUseCase};
pub use room_message::{RoomBroadcast, RoomMessageUseCase};
