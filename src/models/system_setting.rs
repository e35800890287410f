//! Modelo de SystemSetting (ajustes globales clave/valor)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const COMPANY_NAME: &str = "company_name";
pub const MAX_WORK_HOURS: &str = "max_work_hours";
pub const BREAK_DURATION: &str = "break_duration";
pub const LOCATION_UPDATE_INTERVAL: &str = "location_update_interval";

/// SystemSetting - mapea exactamente a la tabla system_settings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemSetting {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}
