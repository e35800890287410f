use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::vehicle_dto::CreateVehicleRequest;
use crate::models::vehicle::Vehicle;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{conflict_error, AppResult};

pub struct VehicleController {
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> AppResult<Vehicle> {
        request.validate()?;

        let name = request.name.trim();
        let plate = request.plate.trim().to_uppercase();

        // Matrícula única entre todos los vehículos, activos o no
        if self.repository.plate_exists(&plate).await? {
            return Err(conflict_error("Vehicle", "plate", &plate));
        }

        let vehicle = self.repository.create(name, &plate, request.vehicle_type).await?;
        info!("🚐 Vehículo creado: {} ({})", vehicle.name, vehicle.plate);

        Ok(vehicle)
    }

    pub async fn list_active(&self) -> AppResult<Vec<Vehicle>> {
        self.repository.list_active().await
    }
}
