//! Acceso a PostgreSQL, un repositorio por tabla principal

pub mod location_repository;
pub mod setting_repository;
pub mod user_repository;
pub mod vehicle_repository;
pub mod work_session_repository;
