//! Domain model: graph, validation, traversal session, events and the
//! persisted progress layout.

pub mod events;
pub mod graph;
pub mod index;
pub mod progress;
pub mod session;
pub mod traversal;
pub mod validation;
