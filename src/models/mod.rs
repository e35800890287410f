//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL, más las reglas puras del ciclo de vida de las jornadas.

pub mod auth;
pub mod break_record;
pub mod location;
pub mod stats;
pub mod system_setting;
pub mod user;
pub mod vehicle;
pub mod work_session;
