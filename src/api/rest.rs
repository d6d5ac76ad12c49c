use crate::api::error::{ApiError, ApiResult};
use crate::api::types::*;
use crate::engine::LinkEngine;
use crate::history::HistoryEntry;
use crate::link::LinkConfig;
use crate::packet::PacketId;
use crate::stats::LinkStats;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};

/// Entries returned by `GET /api/history` when no limit is given
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

pub struct RestApi {
    engine: LinkEngine,
}

impl RestApi {
    pub fn new(engine: LinkEngine) -> Self {
        Self { engine }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .route("/api/packets", post(create_packet).get(list_packets))
            .route("/api/packets/clear", delete(clear_queue))
            .route("/api/packets/:id", get(get_packet))
            .route("/api/transmission/start", post(start_transmission))
            .route("/api/config", get(get_config).post(update_config))
            .route("/api/stats", get(get_stats))
            .route("/api/history", get(get_history))
            .with_state(self.engine.clone())
    }
}

async fn health_check() -> &'static str {
    "OK"
}

async fn create_packet(
    State(engine): State<LinkEngine>,
    body: Result<Json<CreatePacketRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PacketView>)> {
    let Json(req) = body?;
    let packet = engine.create_packet_from_text(&req.packet_type, &req.data)?;
    Ok((StatusCode::CREATED, Json(PacketView::from(&packet))))
}

async fn list_packets(State(engine): State<LinkEngine>) -> Json<Vec<PacketView>> {
    Json(engine.list_packets().iter().map(PacketView::from).collect())
}

async fn get_packet(
    State(engine): State<LinkEngine>,
    Path(id): Path<String>,
) -> ApiResult<Json<PacketView>> {
    let id: PacketId = id
        .parse()
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid packet id {id}: {e}")))?;
    let packet = engine.get_packet(&id)?;
    Ok(Json(PacketView::from(&packet)))
}

async fn clear_queue(State(engine): State<LinkEngine>) -> Json<ClearQueueResponse> {
    let removed = engine.clear_queue();
    Json(ClearQueueResponse {
        removed,
        message: format!("Queue cleared, {removed} packets removed"),
    })
}

async fn start_transmission(State(engine): State<LinkEngine>) -> Json<StartTransmissionResponse> {
    Json(engine.start_transmission().into())
}

async fn get_config(State(engine): State<LinkEngine>) -> Json<LinkConfig> {
    Json(engine.config())
}

async fn update_config(
    State(engine): State<LinkEngine>,
    body: Result<Json<LinkConfig>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Json(config) = body?;
    engine.update_config(config)?;
    Ok(Json(SuccessResponse {
        message: "Configuration updated".to_string(),
    }))
}

async fn get_stats(State(engine): State<LinkEngine>) -> Json<LinkStats> {
    Json(engine.stats())
}

async fn get_history(
    State(engine): State<LinkEngine>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    Ok(Json(engine.recent_history(limit)))
}
