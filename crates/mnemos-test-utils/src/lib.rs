//! Test helpers shared across Mnemos crates.

pub mod backends;
pub mod events;
pub mod generator;

pub use backends::{FailingIndex, FailingListStore};
pub use events::CollectingEventSink;
pub use generator::{EchoGenerator, FailingGenerator, FixedGenerator, RecordingGenerator};
