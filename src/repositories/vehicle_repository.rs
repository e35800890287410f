use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vehicle::{Vehicle, VehicleType};
use crate::utils::errors::{conflict_error, AppResult};

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// La restricción UNIQUE de la matrícula resuelve las altas concurrentes
    pub async fn create(&self, name: &str, plate: &str, vehicle_type: VehicleType) -> AppResult<Vehicle> {
        let result = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, name, plate, vehicle_type, is_active, created_at)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(plate)
        .bind(vehicle_type)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(vehicle) => Ok(vehicle),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(conflict_error("Vehicle", "plate", plate))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_active_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE id = $1 AND is_active",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn list_active(&self) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE is_active ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn plate_exists(&self, plate: &str) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM vehicles WHERE plate = $1)",
        )
        .bind(plate)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }
}
