//! Middleware de autenticación JWT
//!
//! `require_auth` verifica el token Bearer e inyecta el [`AuthenticatedUser`]
//! en las extensions; `require_admin` se apila encima en las rutas de administración.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};
use tracing::warn;

use crate::{
    models::{auth::AuthenticatedUser, user::UserRole},
    state::AppState,
    utils::{
        errors::{AppError, AppResult},
        jwt::{extract_token_from_header, verify_token},
    },
};

/// Middleware de autenticación JWT
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Access token required".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &state.jwt)?;

    request.extensions_mut().insert(AuthenticatedUser::from(claims));

    Ok(next.run(request).await)
}

/// Middleware para verificar permisos de admin
pub async fn require_admin(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&user, UserRole::Admin)?;
    Ok(next.run(request).await)
}

/// Falla con 403 si el rol del usuario no alcanza el requerido
pub fn authorize(user: &AuthenticatedUser, required: UserRole) -> AppResult<()> {
    if user.role.satisfies(required) {
        Ok(())
    } else {
        warn!("⛔ {} ({}) sin permisos de {}", user.email, user.role.as_str(), required.as_str());
        Err(AppError::Forbidden("forbidden".to_string()))
    }
}
