use axum::{extract::State, http::StatusCode, routing::post, Extension, Json, Router};

use crate::controllers::location_controller::LocationController;
use crate::dto::location_dto::RecordLocationRequest;
use crate::models::auth::AuthenticatedUser;
use crate::models::location::Location;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extractors::AppJson;

pub fn create_location_router() -> Router<AppState> {
    Router::new().route("/location", post(record_location))
}

async fn record_location(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(request): AppJson<RecordLocationRequest>,
) -> Result<(StatusCode, Json<Location>), AppError> {
    let controller = LocationController::new(state.pool.clone());
    let response = controller.record(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
