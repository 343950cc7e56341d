//! HTTP API response DTOs.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub members: Vec<MemberDetailDto>,
    pub hand: Option<HandDetailDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberDetailDto {
    pub username: String,
    pub connected_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandDetailDto {
    pub username: String,
    pub raised: bool,
    pub timestamp_milliseconds: i64,
    /// RFC 3339 time the hand was raised, absent when released
    pub raised_at: Option<String>,
}
