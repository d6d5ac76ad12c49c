use crate::packet::PacketStatus;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: PacketStatus,
        to: PacketStatus,
    },

    #[error("Failure probability must be within [0, 1], got {0}")]
    InvalidFailureProbability(f64),

    #[error("Clock rate must be finite and positive, got {0}")]
    InvalidClockRate(f64),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
