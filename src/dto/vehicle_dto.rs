use serde::Deserialize;
use validator::Validate;

use crate::models::vehicle::VehicleType;
use crate::utils::validation::{validate_license_plate, validate_not_empty};

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(max = 100), custom = "validate_not_empty")]
    pub name: String,
    #[validate(custom = "validate_license_plate")]
    pub plate: String,
    #[serde(rename = "type", default)]
    pub vehicle_type: VehicleType,
}
