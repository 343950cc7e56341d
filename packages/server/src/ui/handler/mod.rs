//! Request handlers.

mod http;
mod websocket;

pub use http::{get_room_detail, get_rooms, health_check, not_found};
pub use websocket::{missing_room, websocket_handler};
