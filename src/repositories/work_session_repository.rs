use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::work_session_dto::{SessionFilter, WorkSessionDetail};
use crate::models::{
    break_record::Break,
    stats::SessionTotals,
    user::UserSummary,
    vehicle::Vehicle,
    work_session::{
        ClosedBreak, CompletionPlan, NewWorkSession, PausePlan, ResumePlan, WorkSession,
        WorkSessionStatus,
    },
};
use crate::utils::errors::{AppError, AppResult};

/// Jornada con el nombre y email de su dueño
#[derive(Debug, sqlx::FromRow)]
struct WorkSessionRow {
    #[sqlx(flatten)]
    session: WorkSession,
    user_name: String,
    user_email: String,
}

const SELECT_WITH_USER: &str = r#"
    SELECT ws.*, u.name AS user_name, u.email AS user_email
    FROM work_sessions ws
    JOIN users u ON u.id = ws.user_id
"#;

pub struct WorkSessionRepository {
    pool: PgPool,
}

impl WorkSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserta una jornada ACTIVE; el índice parcial garantiza una sola abierta por usuario
    pub async fn create(&self, new_session: NewWorkSession, now: DateTime<Utc>) -> AppResult<WorkSession> {
        let session = new_session.into_session(now);

        let result = sqlx::query_as::<_, WorkSession>(
            r#"
            INSERT INTO work_sessions (
                id, user_id, vehicle_id, start_time, start_location, start_kilometers,
                work_description, status, break_duration, version, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, 0, $9)
            RETURNING *
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.vehicle_id)
        .bind(session.start_time)
        .bind(&session.start_location)
        .bind(session.start_kilometers)
        .bind(&session.work_description)
        .bind(session.status)
        .bind(session.created_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(created) => Ok(created),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
                "User already has an open work session".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<WorkSession>> {
        let session = sqlx::query_as::<_, WorkSession>("SELECT * FROM work_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(session)
    }

    pub async fn find_open_for_user(&self, user_id: Uuid) -> AppResult<Option<WorkSession>> {
        let session = sqlx::query_as::<_, WorkSession>(
            "SELECT * FROM work_sessions WHERE user_id = $1 AND status IN ('ACTIVE', 'PAUSED') LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Pausa abierta más reciente de la jornada
    pub async fn find_open_break(&self, work_session_id: Uuid) -> AppResult<Option<Break>> {
        let open = sqlx::query_as::<_, Break>(
            r#"
            SELECT * FROM breaks
            WHERE work_session_id = $1 AND end_time IS NULL
            ORDER BY start_time DESC
            LIMIT 1
            "#,
        )
        .bind(work_session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(open)
    }

    /// ACTIVE -> PAUSED e inserción de la pausa, en una sola transacción
    pub async fn apply_pause(&self, session: &WorkSession, plan: &PausePlan) -> AppResult<WorkSession> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, WorkSession>(
            r#"
            UPDATE work_sessions
            SET status = $4, version = version + 1
            WHERE id = $1 AND version = $2 AND status = $3
            RETURNING *
            "#,
        )
        .bind(session.id)
        .bind(plan.expected_version)
        .bind(WorkSessionStatus::Active)
        .bind(WorkSessionStatus::Paused)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(concurrent_modification)?;

        let opened = &plan.opened_break;
        sqlx::query(
            r#"
            INSERT INTO breaks (id, work_session_id, start_time, reason)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(opened.id)
        .bind(opened.work_session_id)
        .bind(opened.start_time)
        .bind(&opened.reason)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// PAUSED -> ACTIVE, cerrando la pausa abierta y acumulando su duración
    pub async fn apply_resume(&self, session: &WorkSession, plan: &ResumePlan) -> AppResult<WorkSession> {
        let mut tx = self.pool.begin().await?;

        if let Some(closed) = &plan.closed_break {
            close_break(&mut tx, closed).await?;
        }

        let updated = sqlx::query_as::<_, WorkSession>(
            r#"
            UPDATE work_sessions
            SET status = $4, break_duration = $5, version = version + 1
            WHERE id = $1 AND version = $2 AND status = $3
            RETURNING *
            "#,
        )
        .bind(session.id)
        .bind(plan.expected_version)
        .bind(WorkSessionStatus::Paused)
        .bind(WorkSessionStatus::Active)
        .bind(plan.break_duration)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(concurrent_modification)?;

        tx.commit().await?;
        Ok(updated)
    }

    /// ACTIVE|PAUSED -> COMPLETED con los totales calculados
    pub async fn apply_end(&self, session: &WorkSession, plan: &CompletionPlan) -> AppResult<WorkSession> {
        let mut tx = self.pool.begin().await?;

        if let Some(closed) = &plan.closed_break {
            close_break(&mut tx, closed).await?;
        }

        let updated = sqlx::query_as::<_, WorkSession>(
            r#"
            UPDATE work_sessions
            SET status = $4,
                end_time = $5,
                end_location = $6,
                end_kilometers = $7,
                total_kilometers = $8,
                break_duration = $9,
                total_hours = $10,
                version = version + 1
            WHERE id = $1 AND version = $2 AND status = $3
            RETURNING *
            "#,
        )
        .bind(session.id)
        .bind(plan.expected_version)
        .bind(plan.expected_status)
        .bind(WorkSessionStatus::Completed)
        .bind(plan.end_time)
        .bind(&plan.end_location)
        .bind(plan.end_kilometers)
        .bind(plan.total_kilometers)
        .bind(plan.break_duration)
        .bind(plan.total_hours)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(concurrent_modification)?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn find_detail(&self, id: Uuid) -> AppResult<Option<WorkSessionDetail>> {
        let row = sqlx::query_as::<_, WorkSessionRow>(&format!("{} WHERE ws.id = $1", SELECT_WITH_USER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.attach_relations(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Listado filtrado, ordenado por inicio descendente
    pub async fn list(&self, filter: &SessionFilter) -> AppResult<Vec<WorkSessionDetail>> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_WITH_USER);
        query.push(" WHERE TRUE");

        if let Some(user_id) = filter.user_id {
            query.push(" AND ws.user_id = ").push_bind(user_id);
        }
        if let Some(status) = filter.status {
            query.push(" AND ws.status = ").push_bind(status);
        }
        push_time_range(&mut query, filter.from, filter.to);

        query.push(" ORDER BY ws.start_time DESC LIMIT ").push_bind(filter.limit);

        let rows = query
            .build_query_as::<WorkSessionRow>()
            .fetch_all(&self.pool)
            .await?;

        self.attach_relations(rows).await
    }

    /// Columnas para las estadísticas, opcionalmente de un solo usuario
    pub async fn totals(
        &self,
        user_id: Option<Uuid>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<SessionTotals>> {
        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT ws.start_time, ws.status, ws.total_hours, ws.break_duration, ws.total_kilometers \
             FROM work_sessions ws WHERE TRUE",
        );

        if let Some(user_id) = user_id {
            query.push(" AND ws.user_id = ").push_bind(user_id);
        }
        push_time_range(&mut query, from, to);

        let totals = query
            .build_query_as::<SessionTotals>()
            .fetch_all(&self.pool)
            .await?;

        Ok(totals)
    }

    async fn attach_relations(&self, rows: Vec<WorkSessionRow>) -> AppResult<Vec<WorkSessionDetail>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let session_ids: Vec<Uuid> = rows.iter().map(|r| r.session.id).collect();
        let mut vehicle_ids: Vec<Uuid> = rows.iter().filter_map(|r| r.session.vehicle_id).collect();
        vehicle_ids.sort();
        vehicle_ids.dedup();

        let vehicles: HashMap<Uuid, Vehicle> = if vehicle_ids.is_empty() {
            HashMap::new()
        } else {
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = ANY($1)")
                .bind(&vehicle_ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|v| (v.id, v))
                .collect()
        };

        let mut breaks: HashMap<Uuid, Vec<Break>> = HashMap::new();
        let all_breaks = sqlx::query_as::<_, Break>(
            "SELECT * FROM breaks WHERE work_session_id = ANY($1) ORDER BY start_time DESC",
        )
        .bind(&session_ids)
        .fetch_all(&self.pool)
        .await?;
        for b in all_breaks {
            breaks.entry(b.work_session_id).or_default().push(b);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let vehicle = row.session.vehicle_id.and_then(|id| vehicles.get(&id).cloned());
                let session_breaks = breaks.remove(&row.session.id).unwrap_or_default();
                WorkSessionDetail {
                    session: row.session,
                    user: UserSummary {
                        name: row.user_name,
                        email: row.user_email,
                    },
                    vehicle,
                    breaks: session_breaks,
                }
            })
            .collect())
    }
}

fn push_time_range(
    query: &mut QueryBuilder<'_, Postgres>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) {
    if let Some(from) = from {
        query.push(" AND ws.start_time >= ").push_bind(from);
    }
    if let Some(to) = to {
        query.push(" AND ws.start_time <= ").push_bind(to);
    }
}

async fn close_break(tx: &mut sqlx::Transaction<'_, Postgres>, closed: &ClosedBreak) -> AppResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE breaks
        SET end_time = $2, duration = $3
        WHERE id = $1 AND end_time IS NULL
        "#,
    )
    .bind(closed.break_id)
    .bind(closed.end_time)
    .bind(closed.duration)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(concurrent_modification());
    }
    Ok(())
}

fn concurrent_modification() -> AppError {
    AppError::Conflict("Work session was modified concurrently, please retry".to_string())
}
