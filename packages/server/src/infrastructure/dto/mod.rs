//! Data Transfer Objects (DTOs).
//!
//! - WebSocket messages live in `handraise_shared::protocol` so the client can use them
//! - `http`: HTTP API response DTOs
//! - `conversion`: Domain entity → DTO conversions

pub mod conversion;
pub mod http;
