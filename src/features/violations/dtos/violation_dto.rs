use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::TimelineDto;
use crate::features::violations::models::{EvidenceMedia, MediaKind, Violation, ViolationStatus};
use crate::shared::locale::Locale;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EvidenceMediaDto {
    pub id: Uuid,
    pub url: String,
    pub kind: MediaKind,
    pub created_at: DateTime<Utc>,
}

impl From<EvidenceMedia> for EvidenceMediaDto {
    fn from(m: EvidenceMedia) -> Self {
        Self {
            id: m.id,
            url: m.url,
            kind: m.kind,
            created_at: m.created_at,
        }
    }
}

/// Display data for a status pill
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusBadgeDto {
    pub status: ViolationStatus,
    pub label: String,
    pub color: String,
    pub icon_class: String,
}

impl StatusBadgeDto {
    pub fn new(status: ViolationStatus, locale: Locale) -> Self {
        Self {
            status,
            label: status.label(locale).to_string(),
            color: status.badge_color().to_string(),
            icon_class: status.icon_class().to_string(),
        }
    }
}

/// Card on the reporter's dashboard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ViolationCardDto {
    pub id: Uuid,
    pub category: String,
    pub location_address: String,
    pub violation_timestamp: NaiveDateTime,
    pub status: ViolationStatus,
    pub status_badge: StatusBadgeDto,
    pub created_at: DateTime<Utc>,
    /// First evidence item, if any
    pub thumbnail_url: Option<String>,
}

/// Dashboard tab counts; `closed` is resolved plus rejected
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TabCountsDto {
    pub all: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub closed: usize,
}

impl TabCountsDto {
    pub fn tally<'a>(statuses: impl IntoIterator<Item = &'a ViolationStatus>) -> Self {
        statuses
            .into_iter()
            .fold(Self::default(), |mut counts, status| {
                counts.all += 1;
                match status {
                    ViolationStatus::Pending => counts.pending += 1,
                    ViolationStatus::InProgress => counts.in_progress += 1,
                    ViolationStatus::Resolved | ViolationStatus::Rejected => counts.closed += 1,
                }
                counts
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReporterDashboardDto {
    pub violations: Vec<ViolationCardDto>,
    pub counts: TabCountsDto,
}

/// Full violation with evidence and rendered timeline
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ViolationDetailDto {
    pub id: Uuid,
    pub reporter_id: String,
    pub category_id: i32,
    pub category: String,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub location_address: String,
    pub violation_timestamp: NaiveDateTime,
    pub description: Option<String>,
    pub plate_number: Option<String>,
    pub status: ViolationStatus,
    pub status_badge: StatusBadgeDto,
    pub created_at: DateTime<Utc>,
    pub evidence: Vec<EvidenceMediaDto>,
    pub timeline: TimelineDto,
}

/// Row on the authority dashboard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorityViolationDto {
    pub id: Uuid,
    /// First 8 characters of the id
    pub short_id: String,
    pub reporter_id: String,
    pub category: String,
    pub location_address: String,
    pub plate_number: Option<String>,
    pub status: ViolationStatus,
    pub status_badge: StatusBadgeDto,
    pub created_at: DateTime<Utc>,
}

/// Response to a successful submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponseDto {
    pub id: Uuid,
    pub category: String,
    pub location_address: String,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub violation_timestamp: NaiveDateTime,
    pub plate_number: Option<String>,
    pub status: ViolationStatus,
    pub created_at: DateTime<Utc>,
    pub evidence: Vec<EvidenceMediaDto>,
    pub files_stored: usize,
}

/// Multipart form accepted by `POST /api/violations` (documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitViolationForm {
    /// Violation category id
    pub category_id: i32,
    /// `YYYY-MM-DD`, not in the future
    pub violation_date: String,
    /// `HH:MM`
    pub violation_time: String,
    /// Required unless both coordinates are sent
    pub location_address: Option<String>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub plate_number: Option<String>,
    pub description: Option<String>,
    /// Photo or video; repeat the part for up to five files
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub evidence: String,
}

pub fn short_id(violation: &Violation) -> String {
    violation.id.simple().to_string()[..8].to_string()
}
