//! UseCase: ダイレクトメッセージ配信処理
//!
//! 宛先の表示名を Registry で解決し、一致した 1 接続だけを配送対象にする。
//! 解決できなかった場合は配送指示なし（送信者へのエラー通知もしない）。

use std::sync::Arc;

use crate::domain::{ConnectionId, DisplayName, MessageContent, RoomId, SessionRegistry};

use super::error::SendError;

/// ダイレクトメッセージの配送指示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectDelivery {
    /// メッセージ本文
    pub text: MessageContent,
    /// Registry から導出した送信者の表示名
    pub sender: DisplayName,
    /// 宛先の接続（表示名が一致した 1 接続のみ）
    pub target: ConnectionId,
}

/// ダイレクトメッセージ配信のユースケース
pub struct DirectMessageUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn SessionRegistry>,
}

impl DirectMessageUseCase {
    /// 新しい DirectMessageUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// ダイレクトメッセージ配信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(DirectDelivery))` - 宛先が解決できた場合の配送指示
    /// * `Ok(None)` - 宛先が解決できなかった場合（黙って破棄する）
    /// * `Err(SendError)` - 未登録の接続、または join 前の接続
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        to: &str,
        text: MessageContent,
    ) -> Result<Option<DirectDelivery>, SendError> {
        let session = self
            .registry
            .session(connection_id)
            .await
            .ok_or_else(|| SendError::UnknownConnection(connection_id.clone()))?;
        let sender = session
            .display_name
            .ok_or_else(|| SendError::NotJoined(connection_id.clone()))?;

        let target = self
            .registry
            .resolve_by_name(&RoomId::default_room(), to)
            .await;

        Ok(target.map(|target| DirectDelivery {
            text,
            sender,
            target,
        }))
    }
}
