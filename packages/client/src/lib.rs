//! Terminal client for the raise-hand room server.
//!
//! Joins one room, shows who is in it and who holds the hand, and counts down
//! the holder's remaining time locally.

pub mod color;
pub mod command;
pub mod countdown;
pub mod error;
pub mod formatter;
pub mod room_name;
pub mod router;
pub mod runner;
pub mod session;
pub mod ui;
pub mod view;

pub use runner::run_client;
