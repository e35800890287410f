use axum::{extract::State, middleware, routing::get, Extension, Json, Router};

use crate::controllers::user_controller::UserController;
use crate::middleware::require_admin;
use crate::models::auth::AuthenticatedUser;
use crate::models::user::{UserResponse, UserWithSessionCount};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route(
            "/",
            get(list_users).route_layer(middleware::from_fn(require_admin)),
        )
}

async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserResponse>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.me(user.user_id).await?;
    Ok(Json(response))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserWithSessionCount>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}
