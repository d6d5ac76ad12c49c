use crate::packet::{Packet, PacketId, PacketStatus, PacketType};
use crate::scheduler::StartOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/packets`. The type stays a string so an unknown
/// type is reported as invalid input rather than a decode failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePacketRequest {
    #[serde(rename = "type")]
    pub packet_type: String,
    pub data: String,
}

/// Wire form of a packet. Payloads are shown as (lossy) UTF-8 text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PacketView {
    pub id: PacketId,
    #[serde(rename = "type")]
    pub packet_type: PacketType,
    pub priority: u8,
    pub data: String,
    pub size_bytes: usize,
    pub compressed_size: usize,
    pub status: PacketStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Packet> for PacketView {
    fn from(packet: &Packet) -> Self {
        Self {
            id: packet.id,
            packet_type: packet.packet_type,
            priority: packet.priority(),
            data: String::from_utf8_lossy(&packet.payload).into_owned(),
            size_bytes: packet.size_bytes,
            compressed_size: packet.compressed_size,
            status: packet.status,
            created_at: packet.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartTransmissionResponse {
    pub outcome: StartOutcome,
    pub message: String,
}

impl From<StartOutcome> for StartTransmissionResponse {
    fn from(outcome: StartOutcome) -> Self {
        let message = match outcome {
            StartOutcome::Started => "Transmission started",
            StartOutcome::AlreadyRunning => "Transmission already in progress",
            StartOutcome::QueueEmpty => "Queue is empty",
        };
        Self {
            outcome,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearQueueResponse {
    pub removed: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::PacketFactory;

    #[test]
    fn test_packet_view_shape() {
        let packet = PacketFactory::new()
            .create(PacketType::Emergency, "MAYDAY", true)
            .unwrap();
        let view = PacketView::from(&packet);
        assert_eq!(view.priority, 1);
        assert_eq!(view.data, "MAYDAY");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["type"], "emergency");
        assert_eq!(json["status"], "queued");
        assert_eq!(json["size_bytes"], 6);
    }

    #[test]
    fn test_create_request_uses_type_key() {
        let req: CreatePacketRequest =
            serde_json::from_str(r#"{"type":"logs","data":"boot ok"}"#).unwrap();
        assert_eq!(req.packet_type, "logs");
        assert_eq!(req.data, "boot ok");
    }

    #[test]
    fn test_start_response_outcome() {
        let json = serde_json::to_value(StartTransmissionResponse::from(
            StartOutcome::AlreadyRunning,
        ))
        .unwrap();
        assert_eq!(json["outcome"], "already_running");
    }
}
