//! InMemory HandState Repository 実装
//!
//! ルームごとに 1 つの `tokio::sync::Mutex` を持つスロットの集合（アリーナ）です。
//! トランザクションはスロットのロックを所有するため、同じルームに対する
//! raise / lower / expire の read-modify-write が交錯することはありません。
//! 書き込みとアラームはステージングされ、`commit` 時にまとめて反映されます。
//! 一度も状態が書き込まれなかったスロットは、最後のトランザクションの終了時に
//! アリーナから取り除かれます。

use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{
    AlarmScheduler, HandState, HandStateRepository, HandStateTransaction, RepositoryError, RoomId,
    Timestamp,
};

#[derive(Debug, Default)]
struct RoomSlot {
    hand_state: Option<HandState>,
}

type RoomArena = StdMutex<HashMap<RoomId, Arc<Mutex<RoomSlot>>>>;

// The arena lock is only held for map access, never across an await.
fn lock_arena(rooms: &RoomArena) -> MutexGuard<'_, HashMap<RoomId, Arc<Mutex<RoomSlot>>>> {
    rooms.lock().unwrap_or_else(PoisonError::into_inner)
}

/// インメモリ HandState Repository 実装
pub struct InMemoryHandStateRepository {
    rooms: Arc<RoomArena>,
    scheduler: Arc<dyn AlarmScheduler>,
}

impl InMemoryHandStateRepository {
    /// 新しい InMemoryHandStateRepository を作成
    ///
    /// `scheduler` は commit されたトランザクションのアラームを登録する先です。
    pub fn new(scheduler: Arc<dyn AlarmScheduler>) -> Self {
        Self {
            rooms: Arc::new(StdMutex::new(HashMap::new())),
            scheduler,
        }
    }

    fn slot(&self, room_id: &RoomId) -> Arc<Mutex<RoomSlot>> {
        lock_arena(&self.rooms)
            .entry(room_id.clone())
            .or_default()
            .clone()
    }

    #[cfg(test)]
    fn room_count(&self) -> usize {
        lock_arena(&self.rooms).len()
    }
}

#[async_trait]
impl HandStateRepository for InMemoryHandStateRepository {
    async fn begin(
        &self,
        room_id: &RoomId,
    ) -> Result<Box<dyn HandStateTransaction>, RepositoryError> {
        let guard = self.slot(room_id).lock_owned().await;
        Ok(Box::new(InMemoryHandStateTransaction {
            room_id: room_id.clone(),
            rooms: self.rooms.clone(),
            guard,
            staged_state: None,
            staged_alarm: None,
            scheduler: self.scheduler.clone(),
        }))
    }

    async fn load(&self, room_id: &RoomId) -> Result<Option<HandState>, RepositoryError> {
        let slot = lock_arena(&self.rooms).get(room_id).cloned();
        match slot {
            Some(slot) => Ok(slot.lock().await.hand_state.clone()),
            None => Ok(None),
        }
    }
}

struct InMemoryHandStateTransaction {
    room_id: RoomId,
    rooms: Arc<RoomArena>,
    guard: OwnedMutexGuard<RoomSlot>,
    staged_state: Option<HandState>,
    staged_alarm: Option<Timestamp>,
    scheduler: Arc<dyn AlarmScheduler>,
}

#[async_trait]
impl HandStateTransaction for InMemoryHandStateTransaction {
    fn get(&self) -> Option<HandState> {
        self.staged_state
            .clone()
            .or_else(|| self.guard.hand_state.clone())
    }

    fn put(&mut self, state: HandState) {
        self.staged_state = Some(state);
    }

    fn set_alarm(&mut self, at: Timestamp) {
        self.staged_alarm = Some(at);
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let mut txn = *self;
        if let Some(state) = txn.staged_state.take() {
            txn.guard.hand_state = Some(state);
        }
        // The alarm is armed before the room lock is released
        if let Some(at) = txn.staged_alarm.take() {
            txn.scheduler.schedule(txn.room_id.clone(), at).await;
            tracing::debug!("Alarm for room '{}' armed at {}", txn.room_id, at.value());
        }
        Ok(())
    }
}

impl Drop for InMemoryHandStateTransaction {
    fn drop(&mut self) {
        if self.guard.hand_state.is_some() {
            return;
        }
        // Evict only when the arena and this guard are the slot's sole owners,
        // so a queued `begin` keeps the slot it is waiting on.
        let slot = OwnedMutexGuard::mutex(&self.guard);
        let mut rooms = lock_arena(&self.rooms);
        let unshared = rooms
            .get(&self.room_id)
            .is_some_and(|entry| Arc::ptr_eq(entry, slot) && Arc::strong_count(slot) == 2);
        if unshared {
            rooms.remove(&self.room_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::Username,
        test_support::{RecordingScheduler, room},
    };
    use std::time::Duration;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - トランザクションの commit / 破棄
    // - commit 時のアラーム登録
    // - 同一ルームのトランザクションの直列化、別ルームの独立性
    // - 書き込みのないスロットの解放
    // ========================================

    fn raised(name: &str, at: i64) -> HandState {
        HandState::raised(Username::from(name), Timestamp::new(at))
    }

    #[tokio::test]
    async fn test_load_unknown_room_is_none() {
        // テスト項目: 一度も書き込まれていないルームの状態は None
        // given (前提条件):
        let repo = InMemoryHandStateRepository::new(Arc::new(RecordingScheduler::default()));

        // when (操作):
        let result = repo.load(&room("demo")).await;

        // then (期待する結果):
        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn test_commit_applies_state_and_alarm_together() {
        // テスト項目: commit で状態とアラームがまとめて反映される
        // given (前提条件):
        let scheduler = Arc::new(RecordingScheduler::default());
        let repo = InMemoryHandStateRepository::new(scheduler.clone());
        let demo = room("demo");

        // when (操作):
        let mut txn = repo.begin(&demo).await.unwrap();
        txn.put(raised("alice", 1_000));
        txn.set_alarm(Timestamp::new(6_250));
        assert_eq!(txn.get(), Some(raised("alice", 1_000)));
        txn.commit().await.unwrap();

        // then (期待する結果):
        assert_eq!(repo.load(&demo).await, Ok(Some(raised("alice", 1_000))));
        assert_eq!(scheduler.pending(&demo).await, Some(Timestamp::new(6_250)));
    }

    #[tokio::test]
    async fn test_dropped_transaction_is_discarded() {
        // テスト項目: commit せずに破棄したトランザクションは何も反映しない
        // given (前提条件):
        let scheduler = Arc::new(RecordingScheduler::default());
        let repo = InMemoryHandStateRepository::new(scheduler.clone());
        let demo = room("demo");

        // when (操作):
        {
            let mut txn = repo.begin(&demo).await.unwrap();
            txn.put(raised("alice", 1_000));
            txn.set_alarm(Timestamp::new(6_250));
        }

        // then (期待する結果):
        assert_eq!(repo.load(&demo).await, Ok(None));
        assert_eq!(scheduler.pending(&demo).await, None);
    }

    #[tokio::test]
    async fn test_transactions_on_same_room_are_serialized() {
        // テスト項目: 同じルームの 2 つ目のトランザクションは 1 つ目の終了を待つ
        // given (前提条件):
        let repo = Arc::new(InMemoryHandStateRepository::new(Arc::new(
            RecordingScheduler::default(),
        )));
        let demo = room("demo");
        let first = repo.begin(&demo).await.unwrap();

        // when (操作):
        let repo_clone = repo.clone();
        let demo_clone = demo.clone();
        let mut second = tokio::spawn(async move {
            let txn = repo_clone.begin(&demo_clone).await.unwrap();
            txn.get()
        });
        let blocked = tokio::time::timeout(Duration::from_millis(50), &mut second).await;

        let mut first = first;
        first.put(raised("alice", 1_000));
        first.commit().await.unwrap();
        let seen = second.await.unwrap();

        // then (期待する結果): 2 つ目は 1 つ目の書き込みを観測する
        assert!(blocked.is_err());
        assert_eq!(seen, Some(raised("alice", 1_000)));
    }

    #[tokio::test]
    async fn test_rooms_are_independent() {
        // テスト項目: 別ルームのトランザクションは互いをブロックしない
        // given (前提条件):
        let repo = InMemoryHandStateRepository::new(Arc::new(RecordingScheduler::default()));
        let _held = repo.begin(&room("first")).await.unwrap();

        // when (操作):
        let other = tokio::time::timeout(Duration::from_millis(50), repo.begin(&room("second")))
            .await;

        // then (期待する結果):
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn test_read_only_transactions_leave_no_slots() {
        // テスト項目: 書き込みのないトランザクションはスロットを残さない
        // given (前提条件):
        let repo = InMemoryHandStateRepository::new(Arc::new(RecordingScheduler::default()));

        // when (操作):
        for i in 0..1_000 {
            let txn = repo.begin(&room(&format!("room-{}", i))).await.unwrap();
            assert_eq!(txn.get(), None);
            txn.commit().await.unwrap();
        }
        let uncommitted = repo.begin(&room("uncommitted")).await.unwrap();
        drop(uncommitted);

        // then (期待する結果):
        assert_eq!(repo.room_count(), 0);
    }

    #[tokio::test]
    async fn test_written_slot_is_kept() {
        // テスト項目: 状態が書き込まれたスロットは下げた後も残る
        // given (前提条件):
        let repo = InMemoryHandStateRepository::new(Arc::new(RecordingScheduler::default()));
        let demo = room("demo");

        // when (操作):
        let mut txn = repo.begin(&demo).await.unwrap();
        txn.put(HandState::released(Username::from("alice")));
        txn.commit().await.unwrap();
        let read_only = repo.begin(&demo).await.unwrap();
        drop(read_only);

        // then (期待する結果):
        assert_eq!(repo.room_count(), 1);
        assert_eq!(
            repo.load(&demo).await,
            Ok(Some(HandState::released(Username::from("alice"))))
        );
    }

    #[tokio::test]
    async fn test_waiter_keeps_slot_of_empty_transaction() {
        // テスト項目: 空のトランザクションの後ろで待つトランザクションの書き込みは失われない
        // given (前提条件):
        let repo = Arc::new(InMemoryHandStateRepository::new(Arc::new(
            RecordingScheduler::default(),
        )));
        let demo = room("demo");
        let empty = repo.begin(&demo).await.unwrap();

        let repo_clone = repo.clone();
        let demo_clone = demo.clone();
        let waiter = tokio::spawn(async move {
            let mut txn = repo_clone.begin(&demo_clone).await.unwrap();
            txn.put(raised("bob", 2_000));
            txn.commit().await.unwrap();
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        // when (操作):
        drop(empty);
        waiter.await.unwrap();

        // then (期待する結果):
        assert_eq!(repo.load(&demo).await, Ok(Some(raised("bob", 2_000))));
        assert_eq!(repo.room_count(), 1);
    }
}
