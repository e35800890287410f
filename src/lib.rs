//! Worksite Tracker
//!
//! API de control de jornadas de trabajo en obra: login, jornadas con pausas,
//! posiciones GPS, vehículos, estadísticas y ajustes del sistema.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
