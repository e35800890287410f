use serde::Deserialize;
use validator::Validate;

use crate::models::system_setting::{BREAK_DURATION, LOCATION_UPDATE_INTERVAL, MAX_WORK_HOURS};
use crate::utils::errors::AppError;
use crate::utils::validation::validate_positive_integer;

// Request para crear o actualizar un ajuste
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettingRequest {
    #[validate(length(max = 1000))]
    pub value: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

impl UpdateSettingRequest {
    /// Los ajustes numéricos conocidos deben ser enteros positivos
    pub fn validate_for_key(&self, key: &str) -> Result<(), AppError> {
        self.validate()?;

        if key.trim().is_empty() || key.len() > 100 {
            return Err(AppError::BadRequest("Setting key must be 1-100 characters".to_string()));
        }

        if [MAX_WORK_HOURS, BREAK_DURATION, LOCATION_UPDATE_INTERVAL].contains(&key) {
            validate_positive_integer(&self.value).map_err(|e| {
                let mut errors = validator::ValidationErrors::new();
                errors.add("value", e);
                AppError::Validation(errors)
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::system_setting::COMPANY_NAME;

    fn request(value: &str) -> UpdateSettingRequest {
        UpdateSettingRequest {
            value: value.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_numeric_settings_are_checked() {
        assert!(request("600000").validate_for_key(LOCATION_UPDATE_INTERVAL).is_ok());
        assert!(matches!(
            request("soon").validate_for_key(LOCATION_UPDATE_INTERVAL),
            Err(AppError::Validation(_))
        ));
        assert!(request("FENIX Construction").validate_for_key(COMPANY_NAME).is_ok());
    }
}
