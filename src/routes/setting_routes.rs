use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::setting_controller::SettingController;
use crate::models::system_setting::SystemSetting;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_setting_router() -> Router<AppState> {
    Router::new().route("/", get(list_settings))
}

async fn list_settings(State(state): State<AppState>) -> Result<Json<Vec<SystemSetting>>, AppError> {
    let controller = SettingController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}
