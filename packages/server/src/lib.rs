//! Room server for a virtual raise-hand token.
//!
//! One member per room may hold the hand at a time. A held hand is released by
//! its holder or automatically once it is older than the timeout.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod bootstrap;

#[cfg(test)]
mod test_support;
