//! State-change notifications published by the engine
//!
//! Delivery is best effort over a `tokio::sync::broadcast` channel: slow
//! subscribers may observe `Lagged` and miss events. Correctness of the
//! engine never depends on anyone listening.

use crate::history::HistoryEntry;
use crate::link::LinkConfig;
use crate::packet::{PacketId, PacketType};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum LinkEvent {
    PacketQueued {
        packet_id: PacketId,
        packet_type: PacketType,
        compressed_size: usize,
    },
    TransmissionStarted {
        packet_id: PacketId,
        packet_type: PacketType,
        started_at: f64,
        expected_duration: f64,
    },
    TransmissionFinished(HistoryEntry),
    QueueCleared {
        removed: usize,
    },
    ConfigUpdated(LinkConfig),
    DrainIdle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let msg = LinkEvent::QueueCleared { removed: 3 };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("QueueCleared"));
        assert!(json.contains("\"removed\":3"));

        let idle = serde_json::to_string(&LinkEvent::DrainIdle).unwrap();
        assert_eq!(idle, r#"{"type":"DrainIdle"}"#);
    }
}
