//! Módulo de base de datos
//!
//! Conexión, migraciones y chequeo de salud de PostgreSQL

pub mod connection;

pub use connection::{connect, ping, run_migrations};
