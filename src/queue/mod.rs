pub mod queue;
pub mod types;

pub use queue::TransmissionQueue;
pub use types::QueueStats;
