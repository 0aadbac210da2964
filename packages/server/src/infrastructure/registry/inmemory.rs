//! InMemory SessionRegistry 実装
//!
//! セッション表とルーム表を単一の Mutex で保護するインメモリ実装。
//! 全ての変更操作とファンアウト用スナップショットが同じロックを取るため、
//! evict と members_of が交錯して退出済みの接続が配送対象に残ることはない。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use idobata_shared::time::get_jst_timestamp;

use crate::domain::{
    ConnectionId, DisplayName, Eviction, RegistryError, Room, RoomId, Session, SessionRegistry,
    Timestamp,
};

/// One registered session plus its registration sequence number.
///
/// The sequence number gives `resolve_by_name` a deterministic tie-break
/// when two sessions share a display name: the earliest-registered wins.
struct SessionSlot {
    session: Session,
    seq: u64,
}

#[derive(Default)]
struct RegistryState {
    sessions: HashMap<ConnectionId, SessionSlot>,
    rooms: HashMap<RoomId, Room>,
    next_seq: u64,
}

/// In-memory session registry.
///
/// The single shared mutable resource of the server; constructed once at
/// startup and injected into the usecase layer and the gateway.
pub struct InMemorySessionRegistry {
    state: Mutex<RegistryState>,
}

impl InMemorySessionRegistry {
    /// Create a registry with the default room already present.
    pub fn new() -> Self {
        let mut state = RegistryState::default();
        let lobby = RoomId::default_room();
        state.rooms.insert(
            lobby.clone(),
            Room::new(lobby, Timestamp::new(get_jst_timestamp())),
        );
        Self {
            state: Mutex::new(state),
        }
    }
}

impl Default for InMemorySessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn register(&self, connection_id: ConnectionId) -> Result<(), RegistryError> {
        let mut state = self.state.lock().await;
        if state.sessions.contains_key(&connection_id) {
            return Err(RegistryError::DuplicateConnection(connection_id));
        }
        let seq = state.next_seq;
        state.next_seq += 1;
        let session = Session::new(connection_id.clone(), Timestamp::new(get_jst_timestamp()));
        state
            .sessions
            .insert(connection_id, SessionSlot { session, seq });
        Ok(())
    }

    async fn set_display_name(
        &self,
        connection_id: &ConnectionId,
        name: DisplayName,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.lock().await;
        let slot = state
            .sessions
            .get_mut(connection_id)
            .ok_or_else(|| RegistryError::UnknownConnection(connection_id.clone()))?;
        slot.session.set_display_name(name);
        Ok(())
    }

    async fn join(
        &self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.lock().await;
        if !state.sessions.contains_key(connection_id) {
            return Err(RegistryError::UnknownConnection(connection_id.clone()));
        }
        state
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id.clone(), Timestamp::new(get_jst_timestamp())))
            .insert_member(connection_id.clone());
        Ok(())
    }

    async fn leave(&self, connection_id: &ConnectionId, room_id: &RoomId) -> Vec<ConnectionId> {
        let mut state = self.state.lock().await;
        match state.rooms.get_mut(room_id) {
            Some(room) => {
                let previous_members = room.members.iter().cloned().collect();
                room.remove_member(connection_id);
                previous_members
            }
            None => Vec::new(),
        }
    }

    async fn evict(&self, connection_id: &ConnectionId) -> Eviction {
        let mut state = self.state.lock().await;
        let Some(slot) = state.sessions.remove(connection_id) else {
            return Eviction::default();
        };
        let mut removed_from = Vec::new();
        for room in state.rooms.values_mut() {
            if room.remove_member(connection_id) {
                removed_from.push(room.id.clone());
            }
        }
        Eviction {
            rooms: removed_from,
            display_name: slot.session.display_name,
        }
    }

    async fn resolve_by_name(&self, room_id: &RoomId, name: &str) -> Option<ConnectionId> {
        let state = self.state.lock().await;
        let room = state.rooms.get(room_id)?;
        room.members
            .iter()
            .filter_map(|id| state.sessions.get(id))
            .filter(|slot| slot.session.has_name(name))
            .min_by_key(|slot| slot.seq)
            .map(|slot| slot.session.id.clone())
    }

    async fn members_of(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let state = self.state.lock().await;
        state
            .rooms
            .get(room_id)
            .map(|room| room.members.iter().cloned().collect())
            .unwrap_or_default()
    }

    async fn session(&self, connection_id: &ConnectionId) -> Option<Session> {
        let state = self.state.lock().await;
        state
            .sessions
            .get(connection_id)
            .map(|slot| slot.session.clone())
    }

    async fn sessions(&self) -> Vec<Session> {
        let state = self.state.lock().await;
        state
            .sessions
            .values()
            .map(|slot| slot.session.clone())
            .collect()
    }

    async fn room(&self, room_id: &RoomId) -> Option<Room> {
        let state = self.state.lock().await;
        state.rooms.get(room_id).cloned()
    }

    async fn rooms(&self) -> Vec<Room> {
        let state = self.state.lock().await;
        state.rooms.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConnectionIdFactory;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemorySessionRegistry の登録・退去・名前解決の各操作
    // - evict がセッション表と全ルームのメンバー表を同時に更新すること
    // - 表示名が重複した場合の resolve_by_name の決定性
    //
    // 【なぜこのテストが必要か】
    // - Registry は全接続が共有する唯一の可変状態
    // - 退去の原子性が崩れると、切断済み接続への配送が発生する
    // - UseCase 層が Registry に依存できるよう、信頼性を担保する
    // ========================================

    fn display_name(name: &str) -> DisplayName {
        DisplayName::new(name.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_register_success() {
        // テスト項目: 接続を登録できる
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let conn = ConnectionIdFactory::generate();

        // when (操作):
        let result = registry.register(conn.clone()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let session = registry.session(&conn).await.unwrap();
        assert_eq!(session.id, conn);
        assert!(session.display_name.is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_fails() {
        // テスト項目: 同じ接続 ID の二重登録はエラーになる
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let conn = ConnectionIdFactory::generate();
        registry.register(conn.clone()).await.unwrap();

        // when (操作):
        let result = registry.register(conn.clone()).await;

        // then (期待する結果):
        assert_eq!(result, Err(RegistryError::DuplicateConnection(conn)));
    }

    #[tokio::test]
    async fn test_set_display_name_unknown_connection_fails() {
        // テスト項目: 未登録の接続への表示名設定はエラーになる
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let conn = ConnectionIdFactory::generate();

        // when (操作):
        let result = registry.set_display_name(&conn, display_name("Alice")).await;

        // then (期待する結果):
        assert_eq!(result, Err(RegistryError::UnknownConnection(conn)));
    }

    #[tokio::test]
    async fn test_set_display_name_overwrites_without_touching_membership() {
        // テスト項目: 表示名の再設定はルームメンバーシップに影響しない
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let conn = ConnectionIdFactory::generate();
        let lobby = RoomId::default_room();
        registry.register(conn.clone()).await.unwrap();
        registry
            .set_display_name(&conn, display_name("Alice"))
            .await
            .unwrap();
        registry.join(&conn, &lobby).await.unwrap();

        // when (操作):
        registry
            .set_display_name(&conn, display_name("Alicia"))
            .await
            .unwrap();

        // then (期待する結果):
        let session = registry.session(&conn).await.unwrap();
        assert!(session.has_name("Alicia"));
        assert_eq!(registry.members_of(&lobby).await, vec![conn]);
    }

    #[tokio::test]
    async fn test_join_unknown_connection_fails() {
        // テスト項目: 未登録の接続はルームに参加できない
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let conn = ConnectionIdFactory::generate();

        // when (操作):
        let result = registry.join(&conn, &RoomId::default_room()).await;

        // then (期待する結果):
        assert_eq!(result, Err(RegistryError::UnknownConnection(conn)));
    }

    #[tokio::test]
    async fn test_join_creates_room_if_absent() {
        // テスト項目: 存在しないルームへの参加でルームが作成される
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let conn = ConnectionIdFactory::generate();
        registry.register(conn.clone()).await.unwrap();
        let side_room = RoomId::new("side".to_string()).unwrap();

        // when (操作):
        registry.join(&conn, &side_room).await.unwrap();

        // then (期待する結果):
        let room = registry.room(&side_room).await.unwrap();
        assert!(room.contains(&conn));
    }

    #[tokio::test]
    async fn test_leave_returns_previous_members() {
        // テスト項目: leave は削除前のメンバー集合を返す
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let lobby = RoomId::default_room();
        let alice = ConnectionIdFactory::generate();
        let bob = ConnectionIdFactory::generate();
        for conn in [&alice, &bob] {
            registry.register(conn.clone()).await.unwrap();
            registry.join(conn, &lobby).await.unwrap();
        }

        // when (操作):
        let previous = registry.leave(&alice, &lobby).await;

        // then (期待する結果): 削除前の 2 人が返り、削除後は bob のみ
        assert_eq!(previous.len(), 2);
        assert!(previous.contains(&alice));
        assert!(previous.contains(&bob));
        assert_eq!(registry.members_of(&lobby).await, vec![bob]);
    }

    #[tokio::test]
    async fn test_leave_non_member_is_noop() {
        // テスト項目: 非メンバーの leave は no-op
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let lobby = RoomId::default_room();
        let alice = ConnectionIdFactory::generate();
        let stranger = ConnectionIdFactory::generate();
        registry.register(alice.clone()).await.unwrap();
        registry.join(&alice, &lobby).await.unwrap();

        // when (操作):
        let previous = registry.leave(&stranger, &lobby).await;

        // then (期待する結果): メンバー集合は変化しない
        assert_eq!(previous, vec![alice.clone()]);
        assert_eq!(registry.members_of(&lobby).await, vec![alice]);
    }

    #[tokio::test]
    async fn test_evict_removes_session_and_membership_atomically() {
        // テスト項目: evict 後はセッション表にも全ルームにも接続が残らない
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let lobby = RoomId::default_room();
        let side_room = RoomId::new("side".to_string()).unwrap();
        let conn = ConnectionIdFactory::generate();
        registry.register(conn.clone()).await.unwrap();
        registry
            .set_display_name(&conn, display_name("Alice"))
            .await
            .unwrap();
        registry.join(&conn, &lobby).await.unwrap();
        registry.join(&conn, &side_room).await.unwrap();

        // when (操作):
        let eviction = registry.evict(&conn).await;

        // then (期待する結果): 両ルームからの退去と表示名が報告される
        assert_eq!(eviction.rooms.len(), 2);
        assert!(eviction.rooms.contains(&lobby));
        assert!(eviction.rooms.contains(&side_room));
        assert_eq!(eviction.display_name, Some(display_name("Alice")));

        // evict 直後のスナップショットに接続は含まれない
        assert!(registry.session(&conn).await.is_none());
        assert!(registry.members_of(&lobby).await.is_empty());
        assert!(registry.members_of(&side_room).await.is_empty());
    }

    #[tokio::test]
    async fn test_evict_unknown_connection_is_noop() {
        // テスト項目: 未登録の接続の evict は空の結果を返す（切断の重複配送耐性）
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let conn = ConnectionIdFactory::generate();

        // when (操作):
        let first = registry.evict(&conn).await;
        let second = registry.evict(&conn).await;

        // then (期待する結果):
        assert!(first.is_noop());
        assert!(second.is_noop());
    }

    #[tokio::test]
    async fn test_resolve_by_name_finds_room_member() {
        // テスト項目: ルームメンバーの表示名を接続 ID に解決できる
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let lobby = RoomId::default_room();
        let alice = ConnectionIdFactory::generate();
        let bob = ConnectionIdFactory::generate();
        for (conn, name) in [(&alice, "Alice"), (&bob, "Bob")] {
            registry.register(conn.clone()).await.unwrap();
            registry
                .set_display_name(conn, display_name(name))
                .await
                .unwrap();
            registry.join(conn, &lobby).await.unwrap();
        }

        // when (操作):
        let resolved = registry.resolve_by_name(&lobby, "Bob").await;

        // then (期待する結果):
        assert_eq!(resolved, Some(bob));
    }

    #[tokio::test]
    async fn test_resolve_by_name_ignores_non_members() {
        // テスト項目: ルームに参加していないセッションは名前解決の対象外
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let lobby = RoomId::default_room();
        let outsider = ConnectionIdFactory::generate();
        registry.register(outsider.clone()).await.unwrap();
        registry
            .set_display_name(&outsider, display_name("Alice"))
            .await
            .unwrap();

        // when (操作):
        let resolved = registry.resolve_by_name(&lobby, "Alice").await;

        // then (期待する結果):
        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn test_resolve_by_name_duplicate_prefers_first_registered() {
        // テスト項目: 表示名が重複した場合、先に登録された接続が選ばれる
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let lobby = RoomId::default_room();
        let first = ConnectionIdFactory::generate();
        let second = ConnectionIdFactory::generate();
        for conn in [&first, &second] {
            registry.register(conn.clone()).await.unwrap();
            registry
                .set_display_name(conn, display_name("Bob"))
                .await
                .unwrap();
            registry.join(conn, &lobby).await.unwrap();
        }

        // when (操作): 何度解決しても同じ結果になる
        for _ in 0..10 {
            let resolved = registry.resolve_by_name(&lobby, "Bob").await;

            // then (期待する結果):
            assert_eq!(resolved, Some(first.clone()));
        }
    }

    #[tokio::test]
    async fn test_resolve_by_name_after_first_evicted() {
        // テスト項目: 先に登録された同名接続の退去後は残りの接続に解決される
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let lobby = RoomId::default_room();
        let first = ConnectionIdFactory::generate();
        let second = ConnectionIdFactory::generate();
        for conn in [&first, &second] {
            registry.register(conn.clone()).await.unwrap();
            registry
                .set_display_name(conn, display_name("Bob"))
                .await
                .unwrap();
            registry.join(conn, &lobby).await.unwrap();
        }

        // when (操作):
        registry.evict(&first).await;

        // then (期待する結果):
        assert_eq!(registry.resolve_by_name(&lobby, "Bob").await, Some(second));
    }

    #[tokio::test]
    async fn test_default_room_exists_at_startup() {
        // テスト項目: 起動直後から既定ルームが存在する
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();

        // when (操作):
        let rooms = registry.rooms().await;

        // then (期待する結果):
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id, RoomId::default_room());
        assert!(rooms[0].members.is_empty());
    }
}
