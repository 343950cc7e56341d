//! Alarm scheduler backed by tokio timers.
//!
//! Each room has at most one pending timer task. Scheduling again aborts the
//! previous task. A fired alarm is delivered as its `RoomId` on an mpsc
//! channel; the receiver runs the expiry check through the usecase layer, so
//! it goes through the same per-room transaction as raise and lower.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use handraise_shared::time::Clock;
use tokio::{
    sync::{Mutex, mpsc},
    task::JoinHandle,
};

use crate::domain::{AlarmScheduler, RoomId, Timestamp};

struct PendingAlarm {
    at: Timestamp,
    generation: u64,
    handle: JoinHandle<()>,
}

pub struct TokioAlarmScheduler {
    clock: Arc<dyn Clock>,
    pending: Arc<Mutex<HashMap<RoomId, PendingAlarm>>>,
    next_generation: AtomicU64,
    fired_tx: mpsc::UnboundedSender<RoomId>,
}

impl TokioAlarmScheduler {
    /// Create a scheduler and the receiver its fired alarms are delivered on.
    pub fn new(clock: Arc<dyn Clock>) -> (Self, mpsc::UnboundedReceiver<RoomId>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            clock,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
            fired_tx,
        };
        (scheduler, fired_rx)
    }

    /// Time of the room's pending alarm, if one is armed.
    #[cfg(test)]
    async fn pending(&self, room_id: &RoomId) -> Option<Timestamp> {
        let pending = self.pending.lock().await;
        pending.get(room_id).map(|alarm| alarm.at)
    }
}

#[async_trait]
impl AlarmScheduler for TokioAlarmScheduler {
    async fn schedule(&self, room_id: RoomId, at: Timestamp) {
        let delay = u64::try_from(at.value() - self.clock.now_millis()).unwrap_or(0);
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);

        let mut pending = self.pending.lock().await;

        let pending_for_task = self.pending.clone();
        let fired_tx = self.fired_tx.clone();
        let room_for_task = room_id.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            {
                let mut pending = pending_for_task.lock().await;
                match pending.get(&room_for_task) {
                    Some(alarm) if alarm.generation == generation => {
                        pending.remove(&room_for_task);
                    }
                    // Replaced by a newer alarm
                    _ => return,
                }
            }
            tracing::debug!("Alarm fired for room '{}'", room_for_task);
            if fired_tx.send(room_for_task.clone()).is_err() {
                tracing::warn!(
                    "Alarm receiver closed, dropping alarm for room '{}'",
                    room_for_task
                );
            }
        });

        if let Some(previous) = pending.insert(
            room_id.clone(),
            PendingAlarm {
                at,
                generation,
                handle,
            },
        ) {
            previous.handle.abort();
            tracing::debug!(
                "Alarm for room '{}' moved from {} to {}",
                room_id,
                previous.at.value(),
                at.value()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handraise_shared::time::FixedClock;

    fn room(name: &str) -> RoomId {
        RoomId::new(name.to_string()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_alarm_fires_after_delay() {
        // テスト項目: 指定時刻になるとルーム ID が通知され、保留中のアラームは消える
        // given (前提条件):
        let (scheduler, mut fired) = TokioAlarmScheduler::new(Arc::new(FixedClock::new(1_000)));
        let demo = room("demo");

        // when (操作):
        scheduler.schedule(demo.clone(), Timestamp::new(6_250)).await;
        assert_eq!(scheduler.pending(&demo).await, Some(Timestamp::new(6_250)));
        let early = tokio::time::timeout(Duration::from_millis(5_000), fired.recv()).await;
        let fired_room = fired.recv().await;

        // then (期待する結果):
        assert!(early.is_err());
        assert_eq!(fired_room, Some(demo.clone()));
        assert_eq!(scheduler.pending(&demo).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_replaces_pending_alarm() {
        // テスト項目: 再スケジュールすると以前のアラームは発火せず、1 回だけ通知される
        // given (前提条件):
        let (scheduler, mut fired) = TokioAlarmScheduler::new(Arc::new(FixedClock::new(0)));
        let demo = room("demo");
        scheduler.schedule(demo.clone(), Timestamp::new(1_000)).await;

        // when (操作):
        scheduler.schedule(demo.clone(), Timestamp::new(3_000)).await;
        let first = tokio::time::timeout(Duration::from_millis(2_000), fired.recv()).await;
        let second = fired.recv().await;
        let third = tokio::time::timeout(Duration::from_millis(10_000), fired.recv()).await;

        // then (期待する結果):
        assert!(first.is_err());
        assert_eq!(second, Some(demo));
        assert!(third.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_past_alarm_fires_immediately() {
        // テスト項目: 過去の時刻を指定したアラームは即座に発火する
        // given (前提条件):
        let (scheduler, mut fired) = TokioAlarmScheduler::new(Arc::new(FixedClock::new(10_000)));

        // when (操作):
        scheduler.schedule(room("late"), Timestamp::new(1)).await;
        let result = tokio::time::timeout(Duration::from_millis(1), fired.recv()).await;

        // then (期待する結果):
        assert_eq!(result.ok().flatten(), Some(room("late")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rooms_have_independent_alarms() {
        // テスト項目: 別ルームのアラームは互いを置き換えない
        // given (前提条件):
        let (scheduler, mut fired) = TokioAlarmScheduler::new(Arc::new(FixedClock::new(0)));

        // when (操作):
        scheduler.schedule(room("alpha"), Timestamp::new(100)).await;
        scheduler.schedule(room("beta"), Timestamp::new(200)).await;
        let first = fired.recv().await;
        let second = fired.recv().await;

        // then (期待する結果):
        assert_eq!(first, Some(room("alpha")));
        assert_eq!(second, Some(room("beta")));
    }
}
