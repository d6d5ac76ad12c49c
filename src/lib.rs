//! Simulated deep-space data link
//!
//! Packets are created with a per-type compression estimate, queued by
//! priority, and drained one at a time over a single channel whose delay
//! is propagation plus bandwidth-limited serialization. Finished
//! transmissions land in a history log from which link stats are derived.

pub mod api;
pub mod config;
pub mod engine;
pub mod events;
pub mod history;
pub mod link;
pub mod metrics;
pub mod packet;
pub mod queue;
pub mod scheduler;
pub mod stats;

pub use engine::{ErrorKind, LinkEngine, LinkError, LinkResult};
