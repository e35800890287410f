use axum::{extract::State, http::StatusCode, middleware, routing::{get, post}, Json, Router};

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::CreateVehicleRequest;
use crate::middleware::require_admin;
use crate::models::vehicle::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extractors::AppJson;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles))
        .route(
            "/",
            post(create_vehicle).route_layer(middleware::from_fn(require_admin)),
        )
}

async fn list_vehicles(State(state): State<AppState>) -> Result<Json<Vec<Vehicle>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.list_active().await?;
    Ok(Json(response))
}

async fn create_vehicle(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<Vehicle>), AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
