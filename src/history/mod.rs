pub mod log;
pub mod types;

pub use log::HistoryLog;
pub use types::HistoryEntry;
