//! UseCase: ルームメッセージ配信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RoomMessageUseCase::execute() メソッド
//! - 送信者名の導出（Registry に登録された表示名を使う）とファンアウト対象選定
//!
//! ### なぜこのテストが必要か
//! - 送信者名をクライアント申告ではなくセッションから導出することを保証
//! - メッセージが送信者本人を含む全メンバーに届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系: メンバーへのブロードキャスト
//! - 異常系: join 前の接続・未登録の接続からの送信

use std::sync::Arc;

use crate::domain::{ConnectionId, DisplayName, MessageContent, RoomId, SessionRegistry};

use super::error::SendError;

/// ルームメッセージの配送指示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomBroadcast {
    /// メッセージ本文
    pub text: MessageContent,
    /// Registry から導出した送信者の表示名
    pub sender: DisplayName,
    /// 配送先（送信者本人を含む現在の全メンバー）
    pub targets: Vec<ConnectionId>,
}

/// ルームメッセージ配信のユースケース
pub struct RoomMessageUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn SessionRegistry>,
}

impl RoomMessageUseCase {
    /// 新しい RoomMessageUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// ルームメッセージ配信を実行
    ///
    /// 送信者の表示名は Registry のセッションから導出する。クライアントが
    /// 申告した sender フィールドはここには届かない。
    ///
    /// # Returns
    ///
    /// * `Ok(RoomBroadcast)` - 本文・送信者名・配送先
    /// * `Err(SendError)` - 未登録の接続、または join 前の接続
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        text: MessageContent,
    ) -> Result<RoomBroadcast, SendError> {
        let session = self
            .registry
            .session(connection_id)
            .await
            .ok_or_else(|| SendError::UnknownConnection(connection_id.clone()))?;
        let sender = session
            .display_name
            .ok_or_else(|| SendError::NotJoined(connection_id.clone()))?;

        let targets = self.registry.members_of(&RoomId::default_room()).await;

        Ok(RoomBroadcast {
            text,
            sender,
            targets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionIdFactory, DisplayName};
    use crate::infrastructure::registry::InMemorySessionRegistry;
    use crate::usecase::JoinRoomUseCase;

    fn display_name(name: &str) -> DisplayName {
        DisplayName::new(name.to_string()).unwrap()
    }

    fn content(text: &str) -> MessageContent {
        MessageContent::new(text.to_string()).unwrap()
    }

    async fn join(registry: &Arc<InMemorySessionRegistry>, name: &str) -> ConnectionId {
        let conn = ConnectionIdFactory::generate();
        registry.register(conn.clone()).await.unwrap();
        JoinRoomUseCase::new(registry.clone())
            .execute(&conn, display_name(name))
            .await
            .unwrap();
        conn
    }

    #[tokio::test]
    async fn test_room_message_fans_out_to_all_members() {
        // テスト項目: ルームメッセージは送信者を含む全メンバーが配送対象
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());
        let alice = join(&registry, "Alice").await;
        let bob = join(&registry, "Bob").await;
        let charlie = join(&registry, "Charlie").await;
        let usecase = RoomMessageUseCase::new(registry.clone());

        // when (操作): alice がメッセージを送信
        let result = usecase.execute(&alice, content("Hello!")).await;

        // then (期待する結果):
        let broadcast = result.unwrap();
        assert_eq!(broadcast.sender, display_name("Alice"));
        assert_eq!(broadcast.text, content("Hello!"));
        assert_eq!(broadcast.targets.len(), 3);
        for conn in [&alice, &bob, &charlie] {
            assert!(broadcast.targets.contains(conn));
        }
    }

    #[tokio::test]
    async fn test_room_message_sender_derived_from_registry() {
        // テスト項目: 送信者名はセッションに登録された表示名から導出される
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());
        let alice = join(&registry, "Alice").await;
        let usecase = RoomMessageUseCase::new(registry.clone());

        // when (操作):
        let broadcast = usecase.execute(&alice, content("hi")).await.unwrap();

        // then (期待する結果):
        assert_eq!(broadcast.sender.as_str(), "Alice");
    }

    #[tokio::test]
    async fn test_room_message_before_join_is_rejected() {
        // テスト項目: join 前の接続からの送信は NotJoined で破棄される
        // given (前提条件): 登録のみで join していない接続
        let registry = Arc::new(InMemorySessionRegistry::new());
        let conn = ConnectionIdFactory::generate();
        registry.register(conn.clone()).await.unwrap();
        let usecase = RoomMessageUseCase::new(registry);

        // when (操作):
        let result = usecase.execute(&conn, content("hi")).await;

        // then (期待する結果):
        assert_eq!(result, Err(SendError::NotJoined(conn)));
    }

    #[tokio::test]
    async fn test_room_message_unknown_connection_is_rejected() {
        // テスト項目: 未登録の接続からの送信は UnknownConnection で破棄される
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());
        let stranger = ConnectionIdFactory::generate();
        let usecase = RoomMessageUseCase::new(registry);

        // when (操作):
        let result = usecase.execute(&stranger, content("hi")).await;

        // then (期待する結果):
        assert_eq!(result, Err(SendError::UnknownConnection(stranger)));
    }
}
