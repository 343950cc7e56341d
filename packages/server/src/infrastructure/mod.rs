//! Infrastructure layer: concrete implementations of the domain collaborators.

pub mod alarm;
pub mod dto;
pub mod message_pusher;
pub mod repository;
