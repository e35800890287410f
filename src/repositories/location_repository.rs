use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::location::{LatestLocationRow, Location, NewLocation};
use crate::utils::errors::AppResult;

pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registro de solo inserción
    pub async fn create(&self, new_location: NewLocation) -> AppResult<Location> {
        let location = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (
                id, user_id, work_session_id, latitude, longitude, accuracy, address, timestamp, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_location.user_id)
        .bind(new_location.work_session_id)
        .bind(new_location.latitude)
        .bind(new_location.longitude)
        .bind(new_location.accuracy)
        .bind(new_location.address)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(location)
    }

    /// Última posición activa de cada usuario, la más reciente primero
    pub async fn latest_per_user(&self) -> AppResult<Vec<LatestLocationRow>> {
        let rows = sqlx::query_as::<_, LatestLocationRow>(
            r#"
            SELECT * FROM (
                SELECT DISTINCT ON (l.user_id)
                       l.*, u.name AS user_name, u.email AS user_email
                FROM locations l
                JOIN users u ON u.id = l.user_id
                WHERE l.is_active AND u.is_active
                ORDER BY l.user_id, l.timestamp DESC
            ) latest
            ORDER BY latest.timestamp DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
