use sqlx::PgPool;
use tracing::info;

use crate::dto::setting_dto::UpdateSettingRequest;
use crate::models::system_setting::SystemSetting;
use crate::repositories::setting_repository::SettingRepository;
use crate::utils::errors::AppResult;

pub struct SettingController {
    repository: SettingRepository,
}

impl SettingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: SettingRepository::new(pool),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<SystemSetting>> {
        self.repository.list().await
    }

    pub async fn update(&self, key: &str, request: UpdateSettingRequest) -> AppResult<SystemSetting> {
        request.validate_for_key(key)?;

        let setting = self
            .repository
            .upsert(key, request.value.trim(), request.description.as_deref())
            .await?;

        info!("⚙️ Ajuste {} = {}", setting.key, setting.value);
        Ok(setting)
    }
}
