//! Objetos de transferencia (requests/responses) de la API

pub mod auth_dto;
pub mod location_dto;
pub mod setting_dto;
pub mod vehicle_dto;
pub mod work_session_dto;
