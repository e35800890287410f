use chrono::Utc;
use sqlx::PgPool;

use crate::dto::work_session_dto::DateRangeQuery;
use crate::models::auth::AuthenticatedUser;
use crate::models::stats::{AdminStats, UserStats};
use crate::repositories::user_repository::UserRepository;
use crate::repositories::work_session_repository::WorkSessionRepository;
use crate::utils::errors::AppResult;

pub struct StatsController {
    sessions: WorkSessionRepository,
    users: UserRepository,
}

impl StatsController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            sessions: WorkSessionRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    pub async fn user_stats(&self, user: &AuthenticatedUser, query: DateRangeQuery) -> AppResult<UserStats> {
        let (from, to) = query.bounds()?;
        let totals = self.sessions.totals(Some(user.user_id), from, to).await?;
        Ok(UserStats::aggregate(&totals, Utc::now()))
    }

    pub async fn admin_stats(&self, query: DateRangeQuery) -> AppResult<AdminStats> {
        let (from, to) = query.bounds()?;
        let totals = self.sessions.totals(None, from, to).await?;
        let total_users = self.users.count_active_employees().await?;
        Ok(AdminStats::aggregate(&totals, total_users))
    }
}
