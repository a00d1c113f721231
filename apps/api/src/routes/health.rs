use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::models::record::format_timestamp;
use crate::state::AppState;

/// GET /api/health
/// Reports service status and store connectivity. Always 200.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let database = state.store.status().await;
    Json(json!({
        "status": "OK",
        "timestamp": format_timestamp(Utc::now()),
        "database": database.as_str(),
        "aiEnabled": state.cover_letters.remote_backend().is_some(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
