use crate::link::ConfigError;
use crate::packet::{PacketError, PacketId};
use crate::scheduler::SchedulerError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad category of a [`LinkError`], for callers that only need to know
/// whose fault it was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Internal,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinkError {
    #[error("Invalid packet: {0}")]
    Packet(#[from] PacketError),

    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("Packet not found: {0}")]
    PacketNotFound(PacketId),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
}

impl LinkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LinkError::Packet(_) | LinkError::Config(_) => ErrorKind::InvalidInput,
            LinkError::PacketNotFound(_) => ErrorKind::NotFound,
            LinkError::Scheduler(SchedulerError::InvalidTransition { .. }) => ErrorKind::Internal,
            LinkError::Scheduler(_) => ErrorKind::InvalidInput,
        }
    }
}

pub type LinkResult<T> = Result<T, LinkError>;
