//! Conversion logic from domain entities to HTTP DTOs.

use handraise_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::entity,
    infrastructure::dto::http::{HandDetailDto, MemberDetailDto},
};

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<entity::Member> for MemberDetailDto {
    fn from(model: entity::Member) -> Self {
        Self {
            username: model.username.into_string(),
            connected_at: timestamp_to_rfc3339(model.connected_at.value()),
        }
    }
}

impl From<entity::HandState> for HandDetailDto {
    fn from(model: entity::HandState) -> Self {
        let raised = !model.is_released();
        Self {
            raised,
            raised_at: if raised {
                timestamp_to_rfc3339(model.acquired_at.value())
            } else {
                None
            },
            timestamp_milliseconds: model.acquired_at.value(),
            username: model.holder.into_string(),
        }
    }
}
