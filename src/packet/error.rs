use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    #[error("Packet payload must not be empty")]
    EmptyPayload,

    #[error("Unknown packet type: {0} (expected emergency, science or logs)")]
    UnknownType(String),
}

pub type PacketResult<T> = Result<T, PacketError>;
