//! Route modules.

pub mod health;
pub mod progress;
pub mod scenarios;
pub mod session;
