use axum::{
    extract::State,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::stats_controller::StatsController;
use crate::dto::work_session_dto::DateRangeQuery;
use crate::models::auth::AuthenticatedUser;
use crate::models::stats::UserStats;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extractors::AppQuery;

pub fn create_stats_router() -> Router<AppState> {
    Router::new().route("/user", get(user_stats))
}

async fn user_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppQuery(query): AppQuery<DateRangeQuery>,
) -> Result<Json<UserStats>, AppError> {
    let controller = StatsController::new(state.pool.clone());
    let response = controller.user_stats(&user, query).await?;
    Ok(Json(response))
}
