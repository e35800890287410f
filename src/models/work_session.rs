//! Modelo de WorkSession y su ciclo de vida
//!
//! Las transiciones (pausar, reanudar, finalizar) se calculan aquí como planes
//! puros a partir del estado leído; el repositorio los aplica dentro de una
//! transacción condicionada por `version`.
//!
//! ```text
//! ACTIVE --pause--> PAUSED --resume--> ACTIVE
//! ACTIVE|PAUSED --end--> COMPLETED
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::models::break_record::{rounded_minutes, Break};
use crate::utils::errors::{validation_error, AppError, AppResult};

/// Estado de la jornada - mapea al ENUM work_session_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "work_session_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkSessionStatus {
    Active,
    Paused,
    Completed,
    /// Representable en el esquema; ninguna operación lo produce
    Cancelled,
}

impl WorkSessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkSessionStatus::Active => "ACTIVE",
            WorkSessionStatus::Paused => "PAUSED",
            WorkSessionStatus::Completed => "COMPLETED",
            WorkSessionStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkSessionStatus::Completed | WorkSessionStatus::Cancelled
        )
    }
}

/// WorkSession - mapea exactamente a la tabla work_sessions
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub start_location: String,
    pub end_location: Option<String>,
    pub start_kilometers: Option<Decimal>,
    pub end_kilometers: Option<Decimal>,
    pub total_kilometers: Option<Decimal>,
    pub work_description: String,
    pub status: WorkSessionStatus,
    /// Minutos de pausa acumulados
    pub break_duration: i32,
    pub total_hours: Option<f64>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

/// Datos para abrir una jornada nueva
#[derive(Debug, Clone)]
pub struct NewWorkSession {
    pub user_id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub start_location: String,
    pub work_description: String,
    pub start_kilometers: Option<Decimal>,
}

impl NewWorkSession {
    pub fn into_session(self, now: DateTime<Utc>) -> WorkSession {
        WorkSession {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            vehicle_id: self.vehicle_id,
            start_time: now,
            end_time: None,
            start_location: self.start_location,
            end_location: None,
            start_kilometers: self.start_kilometers,
            end_kilometers: None,
            total_kilometers: None,
            work_description: self.work_description,
            status: WorkSessionStatus::Active,
            break_duration: 0,
            total_hours: None,
            version: 0,
            created_at: now,
        }
    }
}

/// Cierre de la pausa abierta
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedBreak {
    pub break_id: Uuid,
    pub end_time: DateTime<Utc>,
    pub duration: i32,
}

/// Plan para pausar: la pausa a insertar
#[derive(Debug, Clone, PartialEq)]
pub struct PausePlan {
    pub expected_version: i64,
    pub opened_break: Break,
}

/// Plan para reanudar
#[derive(Debug, Clone, PartialEq)]
pub struct ResumePlan {
    pub expected_version: i64,
    pub closed_break: Option<ClosedBreak>,
    pub break_duration: i32,
}

/// Plan para finalizar
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionPlan {
    pub expected_version: i64,
    pub expected_status: WorkSessionStatus,
    pub end_time: DateTime<Utc>,
    pub end_location: String,
    pub end_kilometers: Option<Decimal>,
    pub total_kilometers: Option<Decimal>,
    pub closed_break: Option<ClosedBreak>,
    pub break_duration: i32,
    pub total_hours: f64,
}

impl WorkSession {
    pub fn plan_pause(&self, reason: String, now: DateTime<Utc>) -> AppResult<PausePlan> {
        if self.status != WorkSessionStatus::Active {
            return Err(invalid_transition("pause", self.status));
        }

        Ok(PausePlan {
            expected_version: self.version,
            opened_break: Break::open(self.id, now.max(self.start_time), reason),
        })
    }

    /// `open_break` es la pausa abierta más reciente de la jornada, si existe
    pub fn plan_resume(&self, open_break: Option<&Break>, now: DateTime<Utc>) -> AppResult<ResumePlan> {
        if self.status != WorkSessionStatus::Paused {
            return Err(invalid_transition("resume", self.status));
        }

        let closed_break = open_break.filter(|b| b.is_open()).map(|b| close_break(b, now));
        let break_duration = self.break_duration + closed_break.as_ref().map_or(0, |c| c.duration);

        Ok(ResumePlan {
            expected_version: self.version,
            closed_break,
            break_duration,
        })
    }

    pub fn plan_end(
        &self,
        open_break: Option<&Break>,
        end_location: String,
        end_kilometers: Option<Decimal>,
        now: DateTime<Utc>,
    ) -> AppResult<CompletionPlan> {
        if self.status.is_terminal() {
            return Err(invalid_transition("end", self.status));
        }

        let total_kilometers = total_kilometers(self.start_kilometers, end_kilometers)?;
        let end_time = now.max(self.start_time);

        // Una pausa abierta se cierra en el instante de fin
        let closed_break = if self.status == WorkSessionStatus::Paused {
            open_break.filter(|b| b.is_open()).map(|b| close_break(b, end_time))
        } else {
            None
        };
        let break_duration = self.break_duration + closed_break.as_ref().map_or(0, |c| c.duration);

        Ok(CompletionPlan {
            expected_version: self.version,
            expected_status: self.status,
            end_time,
            end_location,
            end_kilometers,
            total_kilometers,
            closed_break,
            break_duration,
            total_hours: total_hours(self.start_time, end_time, break_duration),
        })
    }
}

fn close_break(open: &Break, now: DateTime<Utc>) -> ClosedBreak {
    let end_time = now.max(open.start_time);
    ClosedBreak {
        break_id: open.id,
        end_time,
        duration: rounded_minutes(open.start_time, end_time),
    }
}

fn invalid_transition(operation: &str, status: WorkSessionStatus) -> AppError {
    AppError::InvalidState(format!(
        "Cannot {} a work session in status {}",
        operation,
        status.as_str()
    ))
}

/// Distancia recorrida; un odómetro final menor que el inicial es un error de validación
pub fn total_kilometers(start: Option<Decimal>, end: Option<Decimal>) -> AppResult<Option<Decimal>> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(validation_error(
            "endKilometers",
            "endKilometers must be greater than or equal to startKilometers",
        )),
        (Some(start), Some(end)) => Ok(Some(end - start)),
        _ => Ok(None),
    }
}

/// Horas trabajadas descontando las pausas, nunca negativas
pub fn total_hours(start: DateTime<Utc>, end: DateTime<Utc>, break_minutes: i32) -> f64 {
    let worked_seconds = (end - start).num_milliseconds() as f64 / 1000.0;
    let hours = worked_seconds / 3600.0 - break_minutes as f64 / 60.0;
    hours.max(0.0)
}
