use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{UserResponse, UserWithSessionCount};
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{not_found_error, AppResult};

pub struct UserController {
    repository: UserRepository,
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    pub async fn me(&self, user_id: Uuid) -> AppResult<UserResponse> {
        let user = self
            .repository
            .find_by_id(user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| not_found_error("User", &user_id.to_string()))?;

        Ok(UserResponse::from(user))
    }

    pub async fn list(&self) -> AppResult<Vec<UserWithSessionCount>> {
        self.repository.list_active_with_session_counts().await
    }
}
