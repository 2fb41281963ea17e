use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::violations::models::{StatusUpdate, ViolationStatus};
use crate::features::violations::services::AppendOutcome;

/// Request DTO for appending a status update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AppendStatusDto {
    pub status: ViolationStatus,
    #[validate(length(max = 1000, message = "Comment must not exceed 1000 characters"))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdateDto {
    pub id: i64,
    pub violation_id: Uuid,
    pub previous_status: Option<String>,
    pub new_status: String,
    pub comment: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<StatusUpdate> for StatusUpdateDto {
    fn from(u: StatusUpdate) -> Self {
        Self {
            id: u.id,
            violation_id: u.violation_id,
            previous_status: u.previous_status,
            new_status: u.new_status,
            comment: u.comment,
            created_by: u.created_by,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AppendStatusResponseDto {
    pub violation_id: Uuid,
    pub status: ViolationStatus,
    pub update: StatusUpdateDto,
    /// Set when the transition is outside the normal lifecycle
    pub warning: Option<String>,
}

impl From<AppendOutcome> for AppendStatusResponseDto {
    fn from(outcome: AppendOutcome) -> Self {
        Self {
            violation_id: outcome.violation.id,
            status: outcome.violation.status,
            update: outcome.update.into(),
            warning: outcome.warning.map(|w| w.to_string()),
        }
    }
}
