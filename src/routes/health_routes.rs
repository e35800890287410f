use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::error;

use crate::database::ping;
use crate::state::AppState;

pub fn create_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Estado del servicio y de la base de datos
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match ping(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "OK",
                "database": "Connected",
                "timestamp": Utc::now(),
            })),
        ),
        Err(e) => {
            error!("❌ Health check sin base de datos: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "ERROR",
                    "database": "Disconnected",
                    "timestamp": Utc::now(),
                })),
            )
        }
    }
}
