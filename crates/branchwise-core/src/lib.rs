//! Branchwise Core: shared abstractions.
//!
//! This crate defines the error taxonomy, the event envelope, the clock and
//! the ports (content source, key-value store, event publisher) that the
//! scenario engine is wired to. It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod event;
pub mod ports;
