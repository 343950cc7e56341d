//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::{net::TcpListener, sync::mpsc};
use tower_http::trace::TraceLayer;

use crate::{
    domain::RoomId,
    usecase::{
        ConnectMemberUseCase, DisconnectMemberUseCase, ExpireHandUseCase, GetRoomStateUseCase,
        GetRoomsUseCase, LowerHandUseCase, RaiseHandUseCase, run_alarm_loop,
    },
};

use super::{
    handler::{
        get_room_detail, get_rooms, health_check, missing_room, not_found, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

pub type ServerError = Box<dyn std::error::Error + Send + Sync>;

/// Raise-hand room server
///
/// Owns the use cases and the receiver of fired expiry alarms. The alarm loop
/// is started together with the router.
///
/// # Example
///
/// ```ignore
/// let server = bootstrap::build_server(Arc::new(SystemClock));
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: AppState,
    /// ExpireHandUseCase（期限チェックのユースケース）
    expire_hand_usecase: Arc<ExpireHandUseCase>,
    /// 発火したアラームの受信側
    fired_alarms: mpsc::UnboundedReceiver<RoomId>,
}

impl Server {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        connect_member_usecase: Arc<ConnectMemberUseCase>,
        disconnect_member_usecase: Arc<DisconnectMemberUseCase>,
        raise_hand_usecase: Arc<RaiseHandUseCase>,
        lower_hand_usecase: Arc<LowerHandUseCase>,
        expire_hand_usecase: Arc<ExpireHandUseCase>,
        get_room_state_usecase: Arc<GetRoomStateUseCase>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        fired_alarms: mpsc::UnboundedReceiver<RoomId>,
    ) -> Self {
        Self {
            state: AppState {
                connect_member_usecase,
                disconnect_member_usecase,
                raise_hand_usecase,
                lower_hand_usecase,
                get_room_state_usecase,
                get_rooms_usecase,
            },
            expire_hand_usecase,
            fired_alarms,
        }
    }

    /// Build the router and start the alarm loop on the current runtime.
    pub fn into_router(self) -> Router {
        tokio::spawn(run_alarm_loop(self.fired_alarms, self.expire_hand_usecase));

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(missing_room))
            .route("/ws/", get(missing_room))
            .route("/ws/{room_id}", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .fallback(not_found)
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::new(self.state))
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.into_router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }

    /// Run the server until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Raise-hand server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws/<room>?username=<name>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
