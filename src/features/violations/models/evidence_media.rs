use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "media_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// `image/*` → Image, `video/*` → Video, anything else is not evidence
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let major = content_type
            .split('/')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match major.as_str() {
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }
}

/// Database model for one stored evidence file
#[derive(Debug, Clone, FromRow)]
pub struct EvidenceMedia {
    pub id: Uuid,
    pub violation_id: Uuid,
    pub url: String,
    pub kind: MediaKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateEvidenceMedia {
    pub violation_id: Uuid,
    pub url: String,
    pub kind: MediaKind,
}
