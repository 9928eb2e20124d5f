//! Scenario graph loading, validation and navigation.
//!
//! A scenario is a JSON-defined directed graph of narrative nodes joined by
//! labelled, optionally gated choices. The `domain` layer models the graph
//! and the traversal over it; the `application` layer wires that model to
//! content fetch, persistence and statistics through the ports in
//! `branchwise_core::ports`.

pub mod application;
pub mod domain;
