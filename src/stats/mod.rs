pub mod aggregator;
pub mod types;

pub use aggregator::{aggregate, StatsInput};
pub use types::LinkStats;
