//! HTTP request handlers: page, region API, SSE change stream, static assets.

use std::convert::Infallible;
use std::sync::atomic::Ordering;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Html, Json};
use futures_core::Stream;
use rust_embed::Embed;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use pagedash_core::document::{Region, RegionUpdate};

use crate::page::render_page;
use crate::state::{AppState, Changes, SSE_CONNECTIONS};

// ============================================================
// Embedded assets
// ============================================================

#[derive(Embed)]
#[folder = "assets"]
struct Assets;

// ============================================================
// Response types
// ============================================================

/// Markup of one display region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub(crate) struct RegionView {
    /// Element id in the page.
    pub(crate) id: String,
    pub(crate) html: String,
    /// Number of writes the region has received.
    pub(crate) revision: u64,
}

impl From<&RegionUpdate> for RegionView {
    fn from(update: &RegionUpdate) -> Self {
        Self {
            id: update.region.id().to_string(),
            html: update.html.clone(),
            revision: update.revision,
        }
    }
}

/// Current dashboard state.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub(crate) struct RegionsView {
    /// `offline`, `initializing` or `online`.
    pub(crate) connectivity: String,
    pub(crate) snapshot_id: Option<i64>,
    /// Consecutive failed polls.
    pub(crate) failures: u64,
    /// RFC 3339 time of the last applied snapshot.
    pub(crate) updated_at: Option<String>,
    pub(crate) regions: Vec<RegionView>,
}

// ============================================================
// Health
// ============================================================

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    )
)]
pub(crate) async fn handle_health() -> &'static str {
    "ok"
}

// ============================================================
// Page
// ============================================================

pub(crate) async fn serve_index(State(state_tuple): AppState) -> Html<String> {
    let inner = state_tuple.0.lock().unwrap();
    Html(render_page(&inner.dashboard, &inner.backend))
}

// ============================================================
// Regions
// ============================================================

#[utoipa::path(
    get,
    path = "/api/v1/regions",
    responses(
        (status = 200, description = "Current markup of every display region", body = RegionsView)
    )
)]
pub(crate) async fn handle_regions(State(state_tuple): AppState) -> Json<RegionsView> {
    let inner = state_tuple.0.lock().unwrap();
    let dashboard = &inner.dashboard;
    Json(RegionsView {
        connectivity: dashboard.connectivity().as_str().to_string(),
        snapshot_id: dashboard.last_snapshot_id(),
        failures: dashboard.failures(),
        updated_at: inner.last_success.map(|t| t.to_rfc3339()),
        regions: dashboard
            .document()
            .snapshot()
            .iter()
            .map(RegionView::from)
            .collect(),
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/regions/{id}",
    params(("id" = String, Path, description = "Element id of the region, e.g. `main-content`")),
    responses(
        (status = 200, description = "Current markup of the region", body = RegionView),
        (status = 404, description = "Unknown region id")
    )
)]
pub(crate) async fn handle_region(
    State(state_tuple): AppState,
    Path(id): Path<String>,
) -> Result<Json<RegionView>, StatusCode> {
    let region = Region::from_id(&id).ok_or(StatusCode::NOT_FOUND)?;
    let inner = state_tuple.0.lock().unwrap();
    let document = inner.dashboard.document();
    Ok(Json(RegionView {
        id: region.id().to_string(),
        html: document.html(region).to_string(),
        revision: document.revision(region),
    }))
}

// ============================================================
// SSE streaming
// ============================================================

struct SseGuard;

impl Drop for SseGuard {
    fn drop(&mut self) {
        let active = SSE_CONNECTIONS.fetch_sub(1, Ordering::Relaxed) - 1;
        info!(active_connections = active, "SSE client disconnected");
    }
}

/// Change stream item before it is encoded as an SSE event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StreamItem {
    Region(RegionView),
    /// Updates were dropped; the client must reload `/api/v1/regions`.
    Resync,
}

impl StreamItem {
    fn into_event(self) -> Result<Event, serde_json::Error> {
        match self {
            StreamItem::Region(view) => {
                let json = serde_json::to_string(&view)?;
                Ok(Event::default().event("region").data(json))
            }
            StreamItem::Resync => Ok(Event::default().event("resync").data("")),
        }
    }
}

/// Flattens broadcast change batches into per-region items. Ends when the
/// sender is dropped.
pub(crate) fn change_stream(
    mut rx: broadcast::Receiver<Changes>,
) -> impl Stream<Item = StreamItem> {
    async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(changes) => {
                    for update in changes.iter() {
                        yield StreamItem::Region(RegionView::from(update));
                    }
                }
                Err(RecvError::Lagged(n)) => {
                    warn!(skipped = n, "SSE client lagged");
                    yield StreamItem::Resync;
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}

/// One `region` event per region changed by a poll cycle.
pub(crate) async fn handle_stream(
    State(state_tuple): AppState,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (_, tx) = state_tuple;

    let active = SSE_CONNECTIONS.fetch_add(1, Ordering::Relaxed) + 1;
    info!(active_connections = active, "SSE client connected");

    let items = change_stream(tx.subscribe());

    let stream = async_stream::stream! {
        let _guard = SseGuard;
        for await item in items {
            match item.into_event() {
                Ok(event) => yield Ok(event),
                Err(e) => error!(error = %e, "failed to serialize region"),
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

// ============================================================
// Static assets
// ============================================================

pub(crate) async fn serve_asset(Path(path): Path<String>) -> axum::response::Response<Body> {
    match Assets::get(&path) {
        Some(file) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            axum::response::Response::builder()
                .header(header::CONTENT_TYPE, mime.as_ref())
                .body(Body::from(file.data.to_vec()))
                .unwrap()
        }
        None => not_found().await,
    }
}

pub(crate) async fn not_found() -> axum::response::Response<Body> {
    axum::response::Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Body::from("not found"))
        .unwrap()
}
