use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::work_session_controller::WorkSessionController;
use crate::dto::work_session_dto::{
    EndWorkSessionRequest, PauseWorkSessionRequest, StartWorkSessionRequest, WorkSessionDetail,
    WorkSessionQuery,
};
use crate::models::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extractors::{optional_json_body, AppJson, AppPath, AppQuery};

pub fn create_work_session_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_own_sessions))
        .route("/start", post(start_session))
        .route("/:id/pause", put(pause_session))
        .route("/:id/resume", put(resume_session))
        .route("/:id/end", put(end_session))
}

async fn start_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(request): AppJson<StartWorkSessionRequest>,
) -> Result<(StatusCode, Json<WorkSessionDetail>), AppError> {
    let controller = WorkSessionController::new(state.pool.clone());
    let response = controller.start(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// El cuerpo es opcional; sin él la pausa queda sin motivo
async fn pause_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
    body: Bytes,
) -> Result<Json<WorkSessionDetail>, AppError> {
    let request: PauseWorkSessionRequest = optional_json_body(&body)?;
    let controller = WorkSessionController::new(state.pool.clone());
    let response = controller.pause(&user, id, request).await?;
    Ok(Json(response))
}

async fn resume_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<WorkSessionDetail>, AppError> {
    let controller = WorkSessionController::new(state.pool.clone());
    let response = controller.resume(&user, id).await?;
    Ok(Json(response))
}

async fn end_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<EndWorkSessionRequest>,
) -> Result<Json<WorkSessionDetail>, AppError> {
    let controller = WorkSessionController::new(state.pool.clone());
    let response = controller.end(&user, id, request).await?;
    Ok(Json(response))
}

async fn list_own_sessions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppQuery(query): AppQuery<WorkSessionQuery>,
) -> Result<Json<Vec<WorkSessionDetail>>, AppError> {
    let controller = WorkSessionController::new(state.pool.clone());
    let response = controller.list_own(&user, query).await?;
    Ok(Json(response))
}
