use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    break_record::Break,
    user::UserSummary,
    vehicle::Vehicle,
    work_session::{WorkSession, WorkSessionStatus},
};
use crate::utils::errors::AppError;
use crate::utils::validation::{parse_date_bound, validate_not_empty, validate_odometer};

const DEFAULT_OWN_LIMIT: i64 = 50;
const DEFAULT_ADMIN_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 500;

// Request para iniciar una jornada
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartWorkSessionRequest {
    pub vehicle_id: Option<Uuid>,
    #[validate(length(max = 500), custom = "validate_not_empty")]
    pub start_location: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub work_description: String,
    #[validate(custom = "validate_odometer")]
    pub start_kilometers: Option<Decimal>,
}

// Request para finalizar una jornada
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EndWorkSessionRequest {
    #[validate(length(max = 500), custom = "validate_not_empty")]
    pub end_location: String,
    #[validate(custom = "validate_odometer")]
    pub end_kilometers: Option<Decimal>,
}

// Request para pausar una jornada
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PauseWorkSessionRequest {
    #[serde(default)]
    #[validate(length(max = 500))]
    pub reason: String,
}

// Filtros del listado propio
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSessionQuery {
    pub status: Option<WorkSessionStatus>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<i64>,
}

// Filtros del listado de administración
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminWorkSessionQuery {
    pub status: Option<WorkSessionStatus>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub user_id: Option<Uuid>,
    pub limit: Option<i64>,
}

// Rango de fechas opcional (stats)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Filtro ya validado que consume el repositorio
#[derive(Debug, Clone, PartialEq)]
pub struct SessionFilter {
    pub user_id: Option<Uuid>,
    pub status: Option<WorkSessionStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: i64,
}

impl DateRangeQuery {
    pub fn bounds(&self) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), AppError> {
        date_bounds(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

impl WorkSessionQuery {
    /// Siempre restringido a las jornadas del usuario que consulta
    pub fn into_filter(self, user_id: Uuid) -> Result<SessionFilter, AppError> {
        let (from, to) = date_bounds(self.start_date.as_deref(), self.end_date.as_deref())?;
        Ok(SessionFilter {
            user_id: Some(user_id),
            status: self.status,
            from,
            to,
            limit: clamp_limit(self.limit, DEFAULT_OWN_LIMIT),
        })
    }
}

impl AdminWorkSessionQuery {
    pub fn into_filter(self) -> Result<SessionFilter, AppError> {
        let (from, to) = date_bounds(self.start_date.as_deref(), self.end_date.as_deref())?;
        Ok(SessionFilter {
            user_id: self.user_id,
            status: self.status,
            from,
            to,
            limit: clamp_limit(self.limit, DEFAULT_ADMIN_LIMIT),
        })
    }
}

fn clamp_limit(limit: Option<i64>, default: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, MAX_LIMIT)
}

fn date_bounds(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), AppError> {
    let mut errors = validator::ValidationErrors::new();

    let from = start.map(|s| parse_date_bound(s, false)).transpose().unwrap_or_else(|e| {
        errors.add("startDate", e);
        None
    });
    let to = end.map(|s| parse_date_bound(s, true)).transpose().unwrap_or_else(|e| {
        errors.add("endDate", e);
        None
    });

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(AppError::BadRequest("startDate must not be after endDate".to_string()));
        }
    }

    Ok((from, to))
}

/// Jornada con su usuario, vehículo y pausas (las más recientes primero)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSessionDetail {
    #[serde(flatten)]
    pub session: WorkSession,
    pub user: UserSummary,
    pub vehicle: Option<Vehicle>,
    pub breaks: Vec<Break>,
}
