//! Router de la API
//!
//! Todo cuelga de `/api`. Las rutas protegidas pasan por `require_auth`;
//! las de administración añaden `require_admin`.

pub mod admin_routes;
pub mod auth_routes;
pub mod health_routes;
pub mod location_routes;
pub mod setting_routes;
pub mod stats_routes;
pub mod user_routes;
pub mod vehicle_routes;
pub mod work_session_routes;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::{cors_layer, require_auth};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/users", user_routes::create_user_router())
        .nest("/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/work-sessions", work_session_routes::create_work_session_router())
        .nest("/stats", stats_routes::create_stats_router())
        .nest("/settings", setting_routes::create_setting_router())
        .nest("/admin", admin_routes::create_admin_router())
        .merge(location_routes::create_location_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let api = Router::new()
        .merge(health_routes::create_health_router())
        .nest("/auth", auth_routes::create_auth_router(state.clone()))
        .merge(protected);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .with_state(state)
}
