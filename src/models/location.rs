//! Modelo de Location (registro de posiciones, solo inserción)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::user::UserSummary;

/// Location - mapea exactamente a la tabla locations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: Uuid,
    pub user_id: Uuid,
    pub work_session_id: Option<Uuid>,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    pub address: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub is_active: bool,
}

/// Datos para registrar una posición
#[derive(Debug, Clone)]
pub struct NewLocation {
    pub user_id: Uuid,
    pub work_session_id: Option<Uuid>,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    pub address: Option<String>,
}

/// Fila del mapa de administración: última posición de un usuario
#[derive(Debug, Clone, FromRow)]
pub struct LatestLocationRow {
    #[sqlx(flatten)]
    pub location: Location,
    pub user_name: String,
    pub user_email: String,
}

/// Última posición con el resumen del usuario
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLocation {
    #[serde(flatten)]
    pub location: Location,
    pub user: UserSummary,
}

impl From<LatestLocationRow> for UserLocation {
    fn from(row: LatestLocationRow) -> Self {
        Self {
            location: row.location,
            user: UserSummary {
                name: row.user_name,
                email: row.user_email,
            },
        }
    }
}
