//! Shared test doubles for the Branchwise scenario engine.

mod clock;
mod content;
mod publisher;
mod store;

pub use clock::{FixedClock, fixed_instant};
pub use content::{FailingContentSource, StaticContentSource};
pub use publisher::{FailingPublisher, RecordingPublisher};
pub use store::{FailingStore, InMemoryStore, WriteFailingStore};
