//! Lógica de negocio por recurso, sobre los repositorios

pub mod auth_controller;
pub mod location_controller;
pub mod setting_controller;
pub mod stats_controller;
pub mod user_controller;
pub mod vehicle_controller;
pub mod work_session_controller;
