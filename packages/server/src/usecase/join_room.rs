//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 表示名の登録、既定ルームへの参加、参加通知の配送先選定
//!
//! ### なぜこのテストが必要か
//! - 参加通知が新規参加者を含む全メンバーに届くことを保証
//! - 表示名の重複が拒否されないことを確認（重複は仕様上許容される）
//!
//! ### どのような状況を想定しているか
//! - 正常系: 参加と通知
//! - エッジケース: 最初の参加者（通知対象は本人のみ）
//! - 異常系: 未登録の接続からの join

use std::sync::Arc;

use crate::domain::{ConnectionId, DisplayName, RoomId, SessionRegistry};

use super::error::JoinError;

/// 参加通知の配送指示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinNotice {
    /// システム名義で配送する通知本文
    pub notice: String,
    /// 配送先（新規参加者を含む現在の全メンバー）
    pub targets: Vec<ConnectionId>,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn SessionRegistry>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// ルーム参加を実行
    ///
    /// 表示名を登録し、既定ルームに参加したうえで、参加通知の配送指示を
    /// 返す。通知は参加者本人を含む全メンバーに配送される。
    ///
    /// # Returns
    ///
    /// * `Ok(JoinNotice)` - 参加成功。通知本文と配送先
    /// * `Err(JoinError)` - 未登録の接続
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        name: DisplayName,
    ) -> Result<JoinNotice, JoinError> {
        let notice = format!("🔔 {name} has joined the chat.");

        self.registry
            .set_display_name(connection_id, name)
            .await
            .map_err(|_| JoinError::UnknownConnection(connection_id.clone()))?;

        let room = RoomId::default_room();
        self.registry
            .join(connection_id, &room)
            .await
            .map_err(|_| JoinError::UnknownConnection(connection_id.clone()))?;

        let targets = self.registry.members_of(&room).await;

        Ok(JoinNotice { notice, targets })
    }
}
