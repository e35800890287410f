//! Rutas de administración, todas detrás de `require_admin`

use axum::{
    extract::State,
    middleware,
    routing::{get, put},
    Json, Router,
};

use crate::controllers::{
    location_controller::LocationController, setting_controller::SettingController,
    stats_controller::StatsController, work_session_controller::WorkSessionController,
};
use crate::dto::{
    setting_dto::UpdateSettingRequest,
    work_session_dto::{AdminWorkSessionQuery, DateRangeQuery, WorkSessionDetail},
};
use crate::middleware::require_admin;
use crate::models::{location::UserLocation, stats::AdminStats, system_setting::SystemSetting};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extractors::{AppJson, AppPath, AppQuery};

pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/work-sessions", get(list_all_sessions))
        .route("/locations", get(latest_locations))
        .route("/stats", get(admin_stats))
        .route("/settings/:key", put(update_setting))
        .route_layer(middleware::from_fn(require_admin))
}

async fn list_all_sessions(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<AdminWorkSessionQuery>,
) -> Result<Json<Vec<WorkSessionDetail>>, AppError> {
    let controller = WorkSessionController::new(state.pool.clone());
    let response = controller.list_all(query).await?;
    Ok(Json(response))
}

async fn latest_locations(State(state): State<AppState>) -> Result<Json<Vec<UserLocation>>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    let response = controller.latest_per_user().await?;
    Ok(Json(response))
}

async fn admin_stats(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<DateRangeQuery>,
) -> Result<Json<AdminStats>, AppError> {
    let controller = StatsController::new(state.pool.clone());
    let response = controller.admin_stats(query).await?;
    Ok(Json(response))
}

async fn update_setting(
    State(state): State<AppState>,
    AppPath(key): AppPath<String>,
    AppJson(request): AppJson<UpdateSettingRequest>,
) -> Result<Json<SystemSetting>, AppError> {
    let controller = SettingController::new(state.pool.clone());
    let response = controller.update(&key, request).await?;
    Ok(Json(response))
}
