//! Modelo de Vehicle
//!
//! Mapea la tabla `vehicles`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Tipo de vehículo - mapea al ENUM vehicle_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    Van,
    Truck,
    Car,
    Motorcycle,
    Other,
}

impl Default for VehicleType {
    fn default() -> Self {
        VehicleType::Van
    }
}

/// Vehicle - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub plate: String,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
