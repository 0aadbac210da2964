//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::ConnectionId;

/// 接続登録時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// 同じ接続 ID が既に登録されている（ID 生成の欠陥。該当接続のみ致命的）
    #[error("connection '{0}' is already registered")]
    DuplicateConnection(ConnectionId),
}

/// ルーム参加時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// 未登録の接続からの join（切断との競合。ログして破棄する）
    #[error("connection '{0}' is not registered")]
    UnknownConnection(ConnectionId),
}

/// メッセージ送信時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendError {
    /// 未登録の接続からの送信（切断との競合。ログして破棄する）
    #[error("connection '{0}' is not registered")]
    UnknownConnection(ConnectionId),

    /// join 前の接続からの送信。送信者名を導出できないため破棄する
    #[error("connection '{0}' has not joined yet")]
    NotJoined(ConnectionId),
}
