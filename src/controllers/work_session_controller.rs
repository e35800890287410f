//! Ciclo de vida de las jornadas
//!
//! Cada transición lee la jornada, planifica el cambio sobre el modelo
//! (sin I/O) y lo aplica en una transacción condicionada por `version`.

use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::work_session_dto::{
    AdminWorkSessionQuery, EndWorkSessionRequest, PauseWorkSessionRequest, StartWorkSessionRequest,
    WorkSessionDetail, WorkSessionQuery,
};
use crate::models::auth::AuthenticatedUser;
use crate::models::work_session::{NewWorkSession, WorkSession};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::repositories::work_session_repository::WorkSessionRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct WorkSessionController {
    sessions: WorkSessionRepository,
    vehicles: VehicleRepository,
}

impl WorkSessionController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            sessions: WorkSessionRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    pub async fn start(
        &self,
        user: &AuthenticatedUser,
        request: StartWorkSessionRequest,
    ) -> AppResult<WorkSessionDetail> {
        request.validate()?;

        if let Some(vehicle_id) = request.vehicle_id {
            if self.vehicles.find_active_by_id(vehicle_id).await?.is_none() {
                return Err(not_found_error("Vehicle", &vehicle_id.to_string()));
            }
        }

        if self.sessions.find_open_for_user(user.user_id).await?.is_some() {
            return Err(AppError::Conflict(
                "User already has an open work session".to_string(),
            ));
        }

        let session = self
            .sessions
            .create(
                NewWorkSession {
                    user_id: user.user_id,
                    vehicle_id: request.vehicle_id,
                    start_location: request.start_location.trim().to_string(),
                    work_description: request.work_description.trim().to_string(),
                    start_kilometers: request.start_kilometers,
                },
                Utc::now(),
            )
            .await?;

        info!("▶️ Jornada {} iniciada por {}", session.id, user.email);
        self.detail(session.id).await
    }

    pub async fn pause(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: PauseWorkSessionRequest,
    ) -> AppResult<WorkSessionDetail> {
        request.validate()?;

        let session = self.load_accessible(user, id).await?;
        let plan = session.plan_pause(request.reason.trim().to_string(), Utc::now())?;
        self.sessions.apply_pause(&session, &plan).await?;

        info!("⏸️ Jornada {} en pausa", id);
        self.detail(id).await
    }

    pub async fn resume(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<WorkSessionDetail> {
        let session = self.load_accessible(user, id).await?;
        let open_break = self.sessions.find_open_break(id).await?;
        let plan = session.plan_resume(open_break.as_ref(), Utc::now())?;
        let updated = self.sessions.apply_resume(&session, &plan).await?;

        info!("▶️ Jornada {} reanudada ({} min de pausa)", id, updated.break_duration);
        self.detail(id).await
    }

    pub async fn end(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: EndWorkSessionRequest,
    ) -> AppResult<WorkSessionDetail> {
        request.validate()?;

        let session = self.load_accessible(user, id).await?;
        let open_break = self.sessions.find_open_break(id).await?;
        let plan = session.plan_end(
            open_break.as_ref(),
            request.end_location.trim().to_string(),
            request.end_kilometers,
            Utc::now(),
        )?;
        let updated = self.sessions.apply_end(&session, &plan).await?;

        info!(
            "⏹️ Jornada {} finalizada: {:.2} h",
            id,
            updated.total_hours.unwrap_or_default()
        );
        self.detail(id).await
    }

    /// Jornadas propias del usuario autenticado
    pub async fn list_own(
        &self,
        user: &AuthenticatedUser,
        query: WorkSessionQuery,
    ) -> AppResult<Vec<WorkSessionDetail>> {
        let filter = query.into_filter(user.user_id)?;
        self.sessions.list(&filter).await
    }

    pub async fn list_all(&self, query: AdminWorkSessionQuery) -> AppResult<Vec<WorkSessionDetail>> {
        let filter = query.into_filter()?;
        self.sessions.list(&filter).await
    }

    /// Una jornada ajena se reporta como inexistente
    async fn load_accessible(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<WorkSession> {
        self.sessions
            .find_by_id(id)
            .await?
            .filter(|session| user.can_access(session.user_id))
            .ok_or_else(|| not_found_error("WorkSession", &id.to_string()))
    }

    async fn detail(&self, id: Uuid) -> AppResult<WorkSessionDetail> {
        self.sessions
            .find_detail(id)
            .await?
            .ok_or_else(|| not_found_error("WorkSession", &id.to_string()))
    }
}
