//! Code shared by the Handraise server and client.
//!
//! - `protocol`: JSON wire messages and the protocol constants both sides agree on
//! - `time`: clock abstraction and timestamp formatting
//! - `logger`: tracing subscriber setup

pub mod logger;
pub mod protocol;
pub mod time;
