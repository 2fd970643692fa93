//! Request handlers

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::Json;
use futures_util::stream::{self, Stream};
use noether_types::{CollectionKind, ControlCommand, EventEnvelope, RunState};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::time::Duration;

/// Liveness probe
pub async fn health_check() -> &'static str {
    "ok"
}

/// Status payload for pollers
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub state: RunState,
    pub stats: noether_types::EngineStats,
    pub discoveries: Vec<EventEnvelope>,
    pub knowledge_base: Vec<String>,
    pub speculative: Vec<String>,
}

/// Engine state, counters, and recent activity in one response
pub async fn status(State(state): State<AppState>) -> ApiResult<Json<StatusResponse>> {
    let scheduler = &state.scheduler;
    let store = scheduler.store();

    let knowledge_base = store
        .recent(CollectionKind::Proven, 20)?
        .into_iter()
        .map(|e| e.statement)
        .collect();
    let speculative = store
        .recent(CollectionKind::Speculative, 20)?
        .into_iter()
        .map(|e| e.statement)
        .collect();

    Ok(Json(StatusResponse {
        state: scheduler.current_state(),
        stats: scheduler.stats()?,
        discoveries: scheduler.broadcaster().recent(20),
        knowledge_base,
        speculative,
    }))
}

/// Control request body
#[derive(Debug, Deserialize)]
pub struct ControlRequest {
    pub action: String,
}

/// Control response body
#[derive(Debug, Serialize)]
pub struct ControlResponse {
    pub status: &'static str,
    pub state: RunState,
}

/// Apply a start/stop/reset command
pub async fn control(
    State(state): State<AppState>,
    Json(request): Json<ControlRequest>,
) -> ApiResult<Json<ControlResponse>> {
    let command: ControlCommand = request
        .action
        .parse()
        .map_err(ApiError::BadRequest)?;

    let new_state = state.scheduler.handle(command)?;
    Ok(Json(ControlResponse {
        status: "ok",
        state: new_state,
    }))
}

/// Events list query params
#[derive(Debug, Deserialize)]
pub struct GetEventsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

/// Recent events from the bounded history ring
pub async fn get_events(
    State(state): State<AppState>,
    Query(query): Query<GetEventsQuery>,
) -> Json<Vec<EventEnvelope>> {
    Json(state.scheduler.broadcaster().recent(query.limit))
}

/// Stream events via SSE
pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.scheduler.broadcaster().subscribe();

    let stream = stream::unfold(rx, |mut rx| async move {
        match rx.recv().await {
            Ok(envelope) => {
                let json = serde_json::to_string(&envelope).unwrap_or_default();
                Some((Ok(Event::default().data(json)), rx))
            }
            Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {
                // Client lagged behind, continue
                Some((Ok(Event::default().comment("lagged")), rx))
            }
            Err(tokio::sync::broadcast::error::RecvError::Closed) => None,
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

/// Plain-text export of one collection
pub async fn export_collection(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let kind: CollectionKind = collection
        .parse()
        .map_err(ApiError::BadRequest)?;

    let body = state.scheduler.store().export_text(kind)?;
    let filename = format!("attachment; filename=\"{}.txt\"", kind);
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, filename),
        ],
        body,
    ))
}
