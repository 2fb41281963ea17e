use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// One entry of the append-only status log.
///
/// Statuses are kept as text so rows written with legacy spellings
/// ("In Progress") or unknown values still load and render.
#[derive(Debug, Clone, FromRow)]
pub struct StatusUpdate {
    pub id: i64,
    pub violation_id: Uuid,
    pub previous_status: Option<String>,
    pub new_status: String,
    pub comment: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}
