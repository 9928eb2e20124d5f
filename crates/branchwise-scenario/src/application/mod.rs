//! Application services wiring the domain to the ports.

pub mod loader;
pub mod navigator;
pub mod progress_store;
pub mod statistics;
