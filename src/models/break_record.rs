//! Modelo de Break (pausa dentro de una jornada)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Break - mapea exactamente a la tabla breaks
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Break {
    pub id: Uuid,
    pub work_session_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Minutos, se fija al cerrar la pausa
    pub duration: Option<i32>,
    pub reason: String,
}

impl Break {
    pub fn open(work_session_id: Uuid, start_time: DateTime<Utc>, reason: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            work_session_id,
            start_time,
            end_time: None,
            duration: None,
            reason,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

/// Minutos enteros entre dos instantes, redondeados al más cercano y nunca negativos
pub fn rounded_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i32 {
    let millis = (end - start).num_milliseconds().max(0) as f64;
    (millis / 60_000.0).round() as i32
}
