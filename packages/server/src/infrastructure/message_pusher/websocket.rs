//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - ルーム内の接続へのメッセージ送信（broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 同じ表示名の接続が複数あり得るため、キーは表示名ではなく `ConnectionId` です。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!("Connection '{}' unregistered from MessagePusher", connection_id);
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        for target in targets {
            match clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => {
                    if let Err(e) = sender.send(content.to_string()) {
                        tracing::warn!("Failed to push message to connection '{}': {}", target, e);
                    }
                }
                None => {
                    tracing::warn!("Connection '{}' not found during broadcast, skipping", target);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - register / unregister: 登録解除後の接続には届かない
    // - broadcast: 複数接続への送信と、届かない接続の読み飛ばし
    // ========================================

    #[tokio::test]
    async fn test_broadcast_reaches_registered_connections() {
        // テスト項目: 登録された全接続にメッセージが届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();
        pusher.register_client(a, tx_a).await;
        pusher.register_client(b, tx_b).await;

        // when (操作):
        let result = pusher.broadcast(vec![a, b], "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx_a.recv().await, Some("Hello".to_string()));
        assert_eq!(rx_b.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_unregistered_connection_receives_nothing() {
        // テスト項目: 登録解除された接続にはブロードキャストが届かない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let connection_id = ConnectionId::generate();
        pusher.register_client(connection_id, tx).await;
        pusher.unregister_client(&connection_id).await;

        // when (操作):
        let result = pusher.broadcast(vec![connection_id], "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_skips_undeliverable_connections() {
        // テスト項目: 受信側が閉じた接続や未登録の接続があってもブロードキャストは成功する
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx_alive, mut rx_alive) = mpsc::unbounded_channel();
        let (tx_closed, rx_closed) = mpsc::unbounded_channel();
        drop(rx_closed);
        let alive = ConnectionId::generate();
        let closed = ConnectionId::generate();
        pusher.register_client(alive, tx_alive).await;
        pusher.register_client(closed, tx_closed).await;

        // when (操作):
        let result = pusher
            .broadcast(vec![closed, ConnectionId::generate(), alive], "state")
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx_alive.recv().await, Some("state".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_empty_targets() {
        // テスト項目: 空のターゲットリストでもエラーにならない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.broadcast(vec![], "Message").await;

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
