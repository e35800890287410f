//! Estadísticas agregadas de horas y kilómetros

use chrono::{DateTime, Datelike, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::work_session::WorkSessionStatus;

/// Columnas de una jornada necesarias para agregar
#[derive(Debug, Clone, FromRow)]
pub struct SessionTotals {
    pub start_time: DateTime<Utc>,
    pub status: WorkSessionStatus,
    pub total_hours: Option<f64>,
    pub break_duration: i32,
    pub total_kilometers: Option<Decimal>,
}

/// Estadísticas de un trabajador
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_hours: f64,
    pub total_break_hours: f64,
    pub total_kilometers: Decimal,
    pub today_hours: f64,
    pub month_hours: f64,
    pub total_sessions: usize,
}

/// Estadísticas de toda la empresa
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_hours: f64,
    pub total_kilometers: Decimal,
    pub total_sessions: usize,
    pub active_sessions: usize,
    pub total_users: i64,
}

// `Sum` de f64 parte de -0.0; se acumula desde 0.0 para no serializar "-0.0"
fn sum_hours<'a>(sessions: impl Iterator<Item = &'a SessionTotals>) -> f64 {
    sessions.fold(0.0, |acc, s| acc + s.total_hours.unwrap_or(0.0))
}

fn sum_kilometers(sessions: &[SessionTotals]) -> Decimal {
    sessions
        .iter()
        .filter_map(|s| s.total_kilometers)
        .fold(Decimal::ZERO, |acc, km| acc + km)
}

impl UserStats {
    /// "Hoy" y "este mes" se calculan en UTC respecto a `now`
    pub fn aggregate(sessions: &[SessionTotals], now: DateTime<Utc>) -> Self {
        let start_of_day = Utc
            .with_ymd_and_hms(now.year(), now.month(), now.day(), 0, 0, 0)
            .single()
            .unwrap_or(now);
        let start_of_month = Utc
            .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
            .single()
            .unwrap_or(now);

        Self {
            total_hours: sum_hours(sessions.iter()),
            total_break_hours: sessions
                .iter()
                .fold(0.0, |acc, s| acc + s.break_duration as f64 / 60.0),
            total_kilometers: sum_kilometers(sessions),
            today_hours: sum_hours(sessions.iter().filter(|s| s.start_time >= start_of_day)),
            month_hours: sum_hours(sessions.iter().filter(|s| s.start_time >= start_of_month)),
            total_sessions: sessions.len(),
        }
    }
}

impl AdminStats {
    pub fn aggregate(sessions: &[SessionTotals], total_users: i64) -> Self {
        Self {
            total_hours: sum_hours(sessions.iter()),
            total_kilometers: sum_kilometers(sessions),
            total_sessions: sessions.len(),
            active_sessions: sessions
                .iter()
                .filter(|s| s.status == WorkSessionStatus::Active)
                .count(),
            total_users,
        }
    }
}
