use chrono::Utc;
use sqlx::PgPool;

use crate::models::system_setting::SystemSetting;
use crate::utils::errors::AppResult;

pub struct SettingRepository {
    pool: PgPool,
}

impl SettingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<SystemSetting>> {
        let settings = sqlx::query_as::<_, SystemSetting>(
            "SELECT * FROM system_settings ORDER BY key",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Crea o reemplaza el valor; la descripción previa se conserva si no llega una nueva
    pub async fn upsert(&self, key: &str, value: &str, description: Option<&str>) -> AppResult<SystemSetting> {
        let setting = sqlx::query_as::<_, SystemSetting>(
            r#"
            INSERT INTO system_settings (key, value, description, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value,
                description = COALESCE(EXCLUDED.description, system_settings.description),
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(description)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(setting)
    }
}
