use sqlx::PgPool;

use crate::dto::location_dto::RecordLocationRequest;
use crate::models::auth::AuthenticatedUser;
use crate::models::location::{Location, NewLocation, UserLocation};
use crate::repositories::location_repository::LocationRepository;
use crate::repositories::work_session_repository::WorkSessionRepository;
use crate::utils::errors::{not_found_error, AppResult};

pub struct LocationController {
    locations: LocationRepository,
    sessions: WorkSessionRepository,
}

impl LocationController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            locations: LocationRepository::new(pool.clone()),
            sessions: WorkSessionRepository::new(pool),
        }
    }

    /// Válido en cualquier momento; la jornada indicada debe ser del usuario
    pub async fn record(&self, user: &AuthenticatedUser, request: RecordLocationRequest) -> AppResult<Location> {
        request.validate_all()?;

        if let Some(session_id) = request.work_session_id {
            let owned = self
                .sessions
                .find_by_id(session_id)
                .await?
                .is_some_and(|s| s.user_id == user.user_id);
            if !owned {
                return Err(not_found_error("WorkSession", &session_id.to_string()));
            }
        }

        self.locations
            .create(NewLocation {
                user_id: user.user_id,
                work_session_id: request.work_session_id,
                latitude: request.latitude,
                longitude: request.longitude,
                accuracy: request.accuracy,
                address: request.address.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()),
            })
            .await
    }

    /// Mapa de administración
    pub async fn latest_per_user(&self) -> AppResult<Vec<UserLocation>> {
        let rows = self.locations.latest_per_user().await?;
        Ok(rows.into_iter().map(UserLocation::from).collect())
    }
}
