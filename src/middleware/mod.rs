//! Middleware del sistema
//!
//! Autenticación, autorización por rol, CORS y rate limiting del login.

pub mod auth;
pub mod cors;
pub mod rate_limit;

pub use auth::{authorize, require_admin, require_auth};
pub use cors::cors_layer;
pub use rate_limit::{login_rate_limit, RateLimitState};
