use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::violations::models::{
    CreateEvidenceMedia, CreateViolation, EvidenceMedia, StatusUpdate, Violation, ViolationStatus,
};

const VIOLATION_COLUMNS: &str = "id, reporter_id, category_id, location_lat, location_lng, \
     location_address, violation_timestamp, description, plate_number, status, created_at";

const MEDIA_COLUMNS: &str = "id, violation_id, url, kind, created_at";

const STATUS_UPDATE_COLUMNS: &str =
    "id, violation_id, previous_status, new_status, comment, created_by, created_at";

/// Violation after a status append, with the log entry that moved it
#[derive(Debug, Clone)]
pub struct AppendedStatus {
    pub violation: Violation,
    pub update: StatusUpdate,
}

/// Persistence for violations, their evidence and their status log
#[async_trait]
pub trait ViolationRepository: Send + Sync {
    async fn create_violation(&self, data: CreateViolation) -> Result<Violation>;

    async fn create_evidence(&self, data: CreateEvidenceMedia) -> Result<EvidenceMedia>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Violation>>;

    /// Newest first
    async fn list_by_reporter(&self, reporter_id: &str) -> Result<Vec<Violation>>;

    /// Newest first, across all reporters
    async fn list_recent(&self, limit: i64) -> Result<Vec<Violation>>;

    /// Evidence of several violations, each group in upload order
    async fn list_evidence(&self, violation_ids: &[Uuid]) -> Result<Vec<EvidenceMedia>>;

    async fn list_status_updates(&self, violation_id: Uuid) -> Result<Vec<StatusUpdate>>;

    /// Record `new_status` in the log and on the violation as one atomic
    /// step. The appended entry's `previous_status` is the status the
    /// violation held at that moment.
    async fn append_status(
        &self,
        violation_id: Uuid,
        new_status: ViolationStatus,
        comment: Option<String>,
        created_by: Option<String>,
    ) -> Result<AppendedStatus>;
}

pub struct PgViolationRepository {
    pool: PgPool,
}

impl PgViolationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!("Failed to {}: {:?}", context, e);
        AppError::Database(e)
    }
}

#[async_trait]
impl ViolationRepository for PgViolationRepository {
    async fn create_violation(&self, data: CreateViolation) -> Result<Violation> {
        let sql = format!(
            r#"
            INSERT INTO violations (
                id, reporter_id, category_id, location_lat, location_lng,
                location_address, violation_timestamp, description, plate_number, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {VIOLATION_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Violation>(&sql)
            .bind(Uuid::now_v7())
            .bind(&data.reporter_id)
            .bind(data.category_id)
            .bind(data.location_lat)
            .bind(data.location_lng)
            .bind(&data.location_address)
            .bind(data.violation_timestamp)
            .bind(&data.description)
            .bind(&data.plate_number)
            .bind(ViolationStatus::INITIAL)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("create violation"))
    }

    async fn create_evidence(&self, data: CreateEvidenceMedia) -> Result<EvidenceMedia> {
        let sql = format!(
            r#"
            INSERT INTO violation_media (id, violation_id, url, kind)
            VALUES ($1, $2, $3, $4)
            RETURNING {MEDIA_COLUMNS}
            "#
        );

        sqlx::query_as::<_, EvidenceMedia>(&sql)
            .bind(Uuid::now_v7())
            .bind(data.violation_id)
            .bind(&data.url)
            .bind(data.kind)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("create evidence media"))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Violation>> {
        let sql = format!("SELECT {VIOLATION_COLUMNS} FROM violations WHERE id = $1");

        sqlx::query_as::<_, Violation>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("get violation"))
    }

    async fn list_by_reporter(&self, reporter_id: &str) -> Result<Vec<Violation>> {
        let sql = format!(
            r#"
            SELECT {VIOLATION_COLUMNS}
            FROM violations
            WHERE reporter_id = $1
            ORDER BY created_at DESC, id DESC
            "#
        );

        sqlx::query_as::<_, Violation>(&sql)
            .bind(reporter_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list reporter violations"))
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Violation>> {
        let sql = format!(
            r#"
            SELECT {VIOLATION_COLUMNS}
            FROM violations
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#
        );

        sqlx::query_as::<_, Violation>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list recent violations"))
    }

    async fn list_evidence(&self, violation_ids: &[Uuid]) -> Result<Vec<EvidenceMedia>> {
        if violation_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT {MEDIA_COLUMNS}
            FROM violation_media
            WHERE violation_id = ANY($1)
            ORDER BY violation_id, created_at, id
            "#
        );

        sqlx::query_as::<_, EvidenceMedia>(&sql)
            .bind(violation_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list evidence media"))
    }

    async fn list_status_updates(&self, violation_id: Uuid) -> Result<Vec<StatusUpdate>> {
        let sql = format!(
            r#"
            SELECT {STATUS_UPDATE_COLUMNS}
            FROM violation_status_updates
            WHERE violation_id = $1
            ORDER BY created_at, id
            "#
        );

        sqlx::query_as::<_, StatusUpdate>(&sql)
            .bind(violation_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list status updates"))
    }

    async fn append_status(
        &self,
        violation_id: Uuid,
        new_status: ViolationStatus,
        comment: Option<String>,
        created_by: Option<String>,
    ) -> Result<AppendedStatus> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("begin status transaction"))?;

        // Row lock serializes concurrent appends for the same violation
        let current = sqlx::query_scalar::<_, ViolationStatus>(
            "SELECT status FROM violations WHERE id = $1 FOR UPDATE",
        )
        .bind(violation_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("lock violation"))?
        .ok_or_else(|| AppError::NotFound("Violation not found".to_string()))?;

        let insert_sql = format!(
            r#"
            INSERT INTO violation_status_updates
                (violation_id, previous_status, new_status, comment, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {STATUS_UPDATE_COLUMNS}
            "#
        );
        let update = sqlx::query_as::<_, StatusUpdate>(&insert_sql)
            .bind(violation_id)
            .bind(current.as_str())
            .bind(new_status.as_str())
            .bind(&comment)
            .bind(&created_by)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("insert status update"))?;

        let update_sql = format!(
            "UPDATE violations SET status = $2 WHERE id = $1 RETURNING {VIOLATION_COLUMNS}"
        );
        let violation = sqlx::query_as::<_, Violation>(&update_sql)
            .bind(violation_id)
            .bind(new_status)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("update violation status"))?;

        tx.commit()
            .await
            .map_err(db_error("commit status transaction"))?;

        Ok(AppendedStatus { violation, update })
    }
}

#[cfg(test)]
pub use memory::InMemoryViolationRepository;

#[cfg(test)]
mod memory {
    use super::*;
    use chrono::{Duration, Utc};
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct State {
        violations: Vec<Violation>,
        media: Vec<EvidenceMedia>,
        updates: Vec<StatusUpdate>,
    }

    /// Test double holding everything in memory.
    ///
    /// `fail_evidence_after` makes `create_evidence` fail once that many
    /// rows exist.
    #[derive(Default)]
    pub struct InMemoryViolationRepository {
        state: Mutex<State>,
        fail_evidence_after: Option<usize>,
    }

    impl InMemoryViolationRepository {
        pub fn failing_evidence_after(rows: usize) -> Self {
            Self {
                fail_evidence_after: Some(rows),
                ..Default::default()
            }
        }

        pub async fn insert_update(&self, update: StatusUpdate) {
            self.state.lock().await.updates.push(update);
        }

        pub async fn violation_count(&self) -> usize {
            self.state.lock().await.violations.len()
        }

        pub async fn media_count(&self) -> usize {
            self.state.lock().await.media.len()
        }
    }

    fn newest_first(violations: &mut [Violation]) {
        violations.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    }

    #[async_trait]
    impl ViolationRepository for InMemoryViolationRepository {
        async fn create_violation(&self, data: CreateViolation) -> Result<Violation> {
            let mut state = self.state.lock().await;
            // Strictly increasing timestamps keep "newest first" deterministic
            let created_at = Utc::now() + Duration::milliseconds(state.violations.len() as i64);
            let violation = Violation {
                id: Uuid::now_v7(),
                reporter_id: data.reporter_id,
                category_id: data.category_id,
                location_lat: data.location_lat,
                location_lng: data.location_lng,
                location_address: data.location_address,
                violation_timestamp: data.violation_timestamp,
                description: data.description,
                plate_number: data.plate_number,
                status: ViolationStatus::INITIAL,
                created_at,
            };
            state.violations.push(violation.clone());
            Ok(violation)
        }

        async fn create_evidence(&self, data: CreateEvidenceMedia) -> Result<EvidenceMedia> {
            let mut state = self.state.lock().await;
            if self.fail_evidence_after == Some(state.media.len()) {
                return Err(AppError::Internal("evidence insert failed".to_string()));
            }
            let media = EvidenceMedia {
                id: Uuid::now_v7(),
                violation_id: data.violation_id,
                url: data.url,
                kind: data.kind,
                created_at: Utc::now() + Duration::milliseconds(state.media.len() as i64),
            };
            state.media.push(media.clone());
            Ok(media)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Violation>> {
            let state = self.state.lock().await;
            Ok(state.violations.iter().find(|v| v.id == id).cloned())
        }

        async fn list_by_reporter(&self, reporter_id: &str) -> Result<Vec<Violation>> {
            let state = self.state.lock().await;
            let mut found: Vec<_> = state
                .violations
                .iter()
                .filter(|v| v.reporter_id == reporter_id)
                .cloned()
                .collect();
            newest_first(&mut found);
            Ok(found)
        }

        async fn list_recent(&self, limit: i64) -> Result<Vec<Violation>> {
            let mut all = self.state.lock().await.violations.clone();
            newest_first(&mut all);
            all.truncate(limit.max(0) as usize);
            Ok(all)
        }

        async fn list_evidence(&self, violation_ids: &[Uuid]) -> Result<Vec<EvidenceMedia>> {
            let state = self.state.lock().await;
            let mut found: Vec<_> = state
                .media
                .iter()
                .filter(|m| violation_ids.contains(&m.violation_id))
                .cloned()
                .collect();
            found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
            Ok(found)
        }

        async fn list_status_updates(&self, violation_id: Uuid) -> Result<Vec<StatusUpdate>> {
            let state = self.state.lock().await;
            Ok(state
                .updates
                .iter()
                .filter(|u| u.violation_id == violation_id)
                .cloned()
                .collect())
        }

        async fn append_status(
            &self,
            violation_id: Uuid,
            new_status: ViolationStatus,
            comment: Option<String>,
            created_by: Option<String>,
        ) -> Result<AppendedStatus> {
            let mut state = self.state.lock().await;
            let next_id = state.updates.iter().map(|u| u.id).max().unwrap_or(0) + 1;

            let violation = state
                .violations
                .iter_mut()
                .find(|v| v.id == violation_id)
                .ok_or_else(|| AppError::NotFound("Violation not found".to_string()))?;

            let update = StatusUpdate {
                id: next_id,
                violation_id,
                previous_status: Some(violation.status.as_str().to_string()),
                new_status: new_status.as_str().to_string(),
                comment,
                created_by,
                created_at: Utc::now() + Duration::milliseconds(next_id),
            };
            violation.status = new_status;
            let violation = violation.clone();

            state.updates.push(update.clone());
            Ok(AppendedStatus { violation, update })
        }
    }
}
