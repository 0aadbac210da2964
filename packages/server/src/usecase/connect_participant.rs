//! UseCase: 接続登録処理

use std::sync::Arc;

use crate::domain::{ConnectionId, SessionRegistry};

use super::error::ConnectError;

/// 接続登録のユースケース
///
/// ゲートウェイが新しい接続を受け付けた時点で呼ばれる。表示名もルーム
/// メンバーシップも持たないセッションを Registry に作成する。
pub struct ConnectParticipantUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn SessionRegistry>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// 接続登録を実行
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 登録成功
    /// * `Err(ConnectError::DuplicateConnection)` - ID が既に使用されている
    pub async fn execute(&self, connection_id: ConnectionId) -> Result<(), ConnectError> {
        self.registry
            .register(connection_id.clone())
            .await
            .map_err(|_| ConnectError::DuplicateConnection(connection_id))
    }
}
