use crate::packet::error::PacketError;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub type PacketId = Uuid;

/// Kind of outbound data. Determines queue priority and compression policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PacketType {
    Emergency,
    Science,
    Logs,
}

impl PacketType {
    pub const ALL: [PacketType; 3] = [PacketType::Emergency, PacketType::Science, PacketType::Logs];

    /// Priority rank, lower is sent first
    pub fn priority(self) -> u8 {
        match self {
            PacketType::Emergency => 1,
            PacketType::Science => 2,
            PacketType::Logs => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PacketType::Emergency => "emergency",
            PacketType::Science => "science",
            PacketType::Logs => "logs",
        }
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PacketType {
    type Err = PacketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "emergency" => Ok(PacketType::Emergency),
            "science" => Ok(PacketType::Science),
            "logs" => Ok(PacketType::Logs),
            other => Err(PacketError::UnknownType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PacketStatus {
    Queued,
    Transmitting,
    Transmitted,
    Failed,
}

impl PacketStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, PacketStatus::Transmitted | PacketStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PacketStatus::Queued => "queued",
            PacketStatus::Transmitting => "transmitting",
            PacketStatus::Transmitted => "transmitted",
            PacketStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PacketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An outbound packet. Type, payload and sizes are fixed at creation; only
/// `status` changes, and only through the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub id: PacketId,
    pub sequence: u64,
    pub packet_type: PacketType,
    pub payload: Bytes,
    pub size_bytes: usize,
    pub compressed_size: usize,
    pub status: PacketStatus,
    pub created_at: DateTime<Utc>,
}

impl Packet {
    pub fn priority(&self) -> u8 {
        self.packet_type.priority()
    }

    /// `1 - compressed/size`, 0.0 for a packet sent uncompressed
    pub fn compression_ratio(&self) -> f64 {
        crate::packet::compression::compression_ratio(self.size_bytes, self.compressed_size)
    }
}
