use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::utils::errors::AppError;
use crate::utils::validation::{validate_latitude, validate_longitude, validate_non_negative};

// Request para registrar una posición
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordLocationRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub accuracy: f64,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    pub work_session_id: Option<Uuid>,
}

impl RecordLocationRequest {
    /// Valida longitudes de texto, rangos GPS y precisión no negativa
    pub fn validate_all(&self) -> Result<(), AppError> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Err(e) = validate_latitude(self.latitude) {
            errors.add("latitude", e);
        }
        if let Err(e) = validate_longitude(self.longitude) {
            errors.add("longitude", e);
        }
        if let Err(e) = validate_non_negative(&self.accuracy) {
            errors.add("accuracy", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_request_ranges() {
        let ok: RecordLocationRequest = serde_json::from_value(json!({
            "latitude": 41.9981,
            "longitude": 21.4254,
            "accuracy": 12.5
        }))
        .unwrap();
        assert!(ok.validate_all().is_ok());

        let bad: RecordLocationRequest = serde_json::from_value(json!({
            "latitude": 120.0,
            "longitude": 21.4254,
            "accuracy": -1.0
        }))
        .unwrap();
        match bad.validate_all() {
            Err(AppError::Validation(errors)) => {
                assert!(errors.field_errors().contains_key("latitude"));
                assert!(errors.field_errors().contains_key("accuracy"));
                assert!(!errors.field_errors().contains_key("longitude"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
