//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar y convertir string a datetime
pub fn validate_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            let mut error = ValidationError::new("datetime");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"RFC3339".to_string());
            error
        })
}

/// Límite de un rango de fechas: acepta RFC3339 o `YYYY-MM-DD`.
/// Una fecha sin hora como límite final incluye el día completo.
pub fn parse_date_bound(value: &str, inclusive_end: bool) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();
    if let Ok(datetime) = validate_datetime(value) {
        return Ok(datetime);
    }

    let date = validate_date(value)?;
    let time = if inclusive_end {
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)
    }
    .unwrap_or(NaiveTime::MIN);

    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar latitud GPS
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    validate_coordinate("latitude", lat, 90.0)
}

/// Validar longitud GPS
pub fn validate_longitude(lng: f64) -> Result<(), ValidationError> {
    validate_coordinate("longitude", lng, 180.0)
}

fn validate_coordinate(code: &'static str, value: f64, limit: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < -limit || value > limit {
        let mut error = ValidationError::new(code);
        error.add_param("value".into(), &value);
        error.add_param("range".into(), &format!("-{:.1} to {:.1}", limit, limit));
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: &T,
) -> Result<(), ValidationError> {
    if *value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), value);
        return Err(error);
    }
    Ok(())
}

/// Los odómetros se guardan como `NUMERIC(12,2)`: parte entera de 10 dígitos
const ODOMETER_LIMIT_KM: i64 = 10_000_000_000;

/// Validar una lectura de odómetro: `0 <= km < 10^10`
pub fn validate_odometer(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(value)?;
    if *value >= Decimal::new(ODOMETER_LIMIT_KM, 0) {
        let mut error = ValidationError::new("odometer_range");
        error.add_param("value".into(), value);
        error.add_param("max".into(), &"9999999999.99".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de matrícula de vehículo
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    let clean_plate = value.replace([' ', '-', '_'], "");
    if clean_plate.is_empty() || clean_plate.len() > 20 {
        let mut error = ValidationError::new("license_plate");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un ajuste numérico sea un entero positivo
pub fn validate_positive_integer(value: &str) -> Result<(), ValidationError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(()),
        _ => {
            let mut error = ValidationError::new("positive_integer");
            error.add_param("value".into(), &value.to_string());
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-15").is_ok());
        assert!(validate_date("2024/01/15").is_err());
    }

    #[test]
    fn test_parse_date_bound() {
        let start = parse_date_bound("2024-01-15", false).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-01-15T00:00:00+00:00");

        let end = parse_date_bound("2024-01-15", true).unwrap();
        assert!(end > start);
        assert_eq!(end.date_naive(), start.date_naive());

        let exact = parse_date_bound("2024-01-15T08:30:00Z", true).unwrap();
        assert_eq!(exact.to_rfc3339(), "2024-01-15T08:30:00+00:00");

        assert!(parse_date_bound("yesterday", false).is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Site A").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_latitude(41.9981).is_ok());
        assert!(validate_longitude(21.4254).is_ok());
        assert!(validate_latitude(91.0).is_err());
        assert!(validate_longitude(-181.0).is_err());
        assert!(validate_latitude(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(&Decimal::from(0)).is_ok());
        assert!(validate_non_negative(&Decimal::from(125_000)).is_ok());
        assert!(validate_non_negative(&Decimal::from(-1)).is_err());
        assert!(validate_non_negative(&-0.5f64).is_err());
    }

    #[test]
    fn test_validate_odometer_fits_column() {
        assert!(validate_odometer(&Decimal::ZERO).is_ok());
        assert!(validate_odometer(&Decimal::new(999_999_999_999, 2)).is_ok());
        assert!(validate_odometer(&Decimal::new(10_000_000_000, 0)).is_err());
        assert!(validate_odometer(&Decimal::new(100_000_000_000, 0)).is_err());
        assert!(validate_odometer(&Decimal::from(-3)).is_err());
    }

    #[test]
    fn test_validate_license_plate() {
        assert!(validate_license_plate("ABC-123").is_ok());
        assert!(validate_license_plate(" - ").is_err());
        assert!(validate_license_plate(&"A".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_positive_integer() {
        assert!(validate_positive_integer("600000").is_ok());
        assert!(validate_positive_integer("0").is_err());
        assert!(validate_positive_integer("ten").is_err());
    }
}
