//! HTTP server for the bid index.
//!
//! Provides REST API endpoints for:
//! - CRUD operations on bids
//! - Bulk loading from a CSV export
//! - Index statistics
//!
//! Listens on `BID_SERVER_ADDR` (default `0.0.0.0:3001`).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use bid_index::{CsvLayout, Index, IndexConfig, IndexError, IndexStats, Record};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:3001";

/// Application state shared across handlers
struct AppState {
    index: Index,
    layout: CsvLayout,
}

type SharedState = Arc<AppState>;

/// Request to load a CSV file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadRequest {
    path: String,
    layout: Option<CsvLayout>,
}

/// Response for find operations
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FindResponse {
    id: String,
    bid: Option<Record>,
    found: bool,
}

/// Response for operations that return success/failure
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    success: bool,
    message: String,
}

/// Load response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoadResponse {
    loaded: usize,
    replaced: usize,
    skipped: usize,
    elapsed_ms: u64,
}

type ApiError = (StatusCode, Json<OperationResponse>);

fn api_error(status: StatusCode, message: String) -> ApiError {
    (
        status,
        Json(OperationResponse {
            success: false,
            message,
        }),
    )
}

fn status_for(err: &IndexError) -> StatusCode {
    match err {
        IndexError::DuplicateKey(_) => StatusCode::CONFLICT,
        IndexError::InvalidRecord(_)
        | IndexError::InvalidAmount { .. }
        | IndexError::MissingColumn { .. } => StatusCode::BAD_REQUEST,
        IndexError::Io(_) | IndexError::Csv(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let state = Arc::new(AppState {
        index: Index::new(IndexConfig::default()),
        layout: CsvLayout::default(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api", get(list_endpoints))
        .route("/api/bids", get(list_bids).post(insert_bid))
        .route("/api/bids/:id", get(find_bid).delete(remove_bid))
        .route("/api/load", post(load_csv))
        .route("/api/stats", get(get_stats))
        .route("/api/clear", post(clear_index))
        .layer(cors)
        .with_state(state);

    let addr = std::env::var("BID_SERVER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "bid server listening");
    axum::serve(listener, app).await
}

async fn list_endpoints() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "endpoints": [
            "GET    /api/bids      - List all bids in id order",
            "POST   /api/bids      - Insert a bid",
            "GET    /api/bids/:id  - Find a bid by id",
            "DELETE /api/bids/:id  - Remove a bid",
            "POST   /api/load      - Load bids from a CSV file",
            "GET    /api/stats     - Get index statistics",
            "POST   /api/clear     - Remove all bids",
        ]
    }))
}

async fn list_bids(State(state): State<SharedState>) -> Json<Vec<Record>> {
    Json(state.index.records())
}

async fn find_bid(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Json<FindResponse> {
    let bid = state.index.find(&id);
    Json(FindResponse {
        found: bid.is_some(),
        id,
        bid,
    })
}

/// Inserted records are checked by `Record::validate` inside the tree, so an
/// empty id or a negative amount comes back as 400.
async fn insert_bid(
    State(state): State<SharedState>,
    Json(bid): Json<Record>,
) -> Result<Json<OperationResponse>, ApiError> {
    let id = bid.id.clone();
    match state.index.insert(bid) {
        Ok(replaced) => Ok(Json(OperationResponse {
            success: true,
            message: if replaced.is_some() {
                format!("Replaced bid '{}'", id)
            } else {
                format!("Inserted bid '{}'", id)
            },
        })),
        Err(e) => Err(api_error(status_for(&e), format!("Insert failed: {}", e))),
    }
}

async fn remove_bid(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Json<OperationResponse> {
    let removed = state.index.remove(&id);
    Json(OperationResponse {
        success: true,
        message: if removed.is_some() {
            format!("Removed bid '{}'", id)
        } else {
            format!("Bid '{}' not found", id)
        },
    })
}

async fn load_csv(
    State(state): State<SharedState>,
    Json(req): Json<LoadRequest>,
) -> Result<Json<LoadResponse>, ApiError> {
    let layout = req.layout.unwrap_or_else(|| state.layout.clone());
    let index = state.index.clone();
    let path = req.path;

    // The load holds the write lock and does file I/O; keep it off the reactor
    let result = tokio::task::spawn_blocking(move || index.load_csv(&path, &layout))
        .await
        .map_err(|e| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Load task failed: {}", e),
            )
        })?;

    match result {
        Ok(report) => Ok(Json(LoadResponse {
            loaded: report.loaded,
            replaced: report.replaced,
            skipped: report.skipped,
            elapsed_ms: report.elapsed.as_millis() as u64,
        })),
        Err(e) => Err(api_error(status_for(&e), format!("Load failed: {}", e))),
    }
}

async fn get_stats(State(state): State<SharedState>) -> Json<IndexStats> {
    Json(state.index.stats())
}

async fn clear_index(State(state): State<SharedState>) -> Json<OperationResponse> {
    state.index.clear();
    Json(OperationResponse {
        success: true,
        message: "Index cleared".to_string(),
    })
}
