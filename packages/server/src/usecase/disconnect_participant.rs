//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - セッションの退去と、退出通知の配送先選定
//!
//! ### なぜこのテストが必要か
//! - 切断イベントは重複して届くことがあり、通知が 1 回だけ出ることを保証
//! - join せずに切断した接続が退出通知を発生させないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系: 退去と残メンバーへの通知
//! - エッジケース: 最後の参加者の切断（通知対象なし）、join 前の切断
//! - 異常系: 同じ接続の切断が二重に処理される

use std::sync::Arc;

use crate::domain::{ConnectionId, SessionRegistry};

/// 退出通知の配送指示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureNotice {
    /// システム名義で配送する通知本文
    pub notice: String,
    /// 配送先（退去した接続を除く残メンバー）
    pub targets: Vec<ConnectionId>,
}

/// 切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn SessionRegistry>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// 切断を実行
    ///
    /// セッションを退去させ、所属していた各ルームの残メンバーへの退出通知を
    /// 組み立てる。表示名が登録されていなければ通知は出ない。退去済みの接続
    /// に対しては何もしない（切断イベントの重複配送に耐える）。
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<DepartureNotice> {
        let eviction = self.registry.evict(connection_id).await;
        let Some(name) = eviction.display_name else {
            return Vec::new();
        };

        let mut notices = Vec::new();
        for room in &eviction.rooms {
            // evict 後のスナップショットなので退去した接続は含まれない
            let targets = self.registry.members_of(room).await;
            notices.push(DepartureNotice {
                notice: format!("🔴 {name} has left the chat."),
                targets,
            });
        }
        notices
    }
}
