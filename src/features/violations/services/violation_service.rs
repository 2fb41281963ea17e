use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::categories::CategoryRegistry;
use crate::features::violations::dtos::{
    short_id, AuthorityViolationDto, EvidenceMediaDto, ReporterDashboardDto, StatusBadgeDto,
    SubmissionResponseDto, TabCountsDto, TimelineDto, ViolationCardDto, ViolationDetailDto,
};
use crate::features::violations::models::{EvidenceMedia, Violation};
use crate::features::violations::services::repository::ViolationRepository;
use crate::features::violations::services::submission_service::SubmissionOutcome;
use crate::features::violations::services::timeline::render_timeline;
use crate::shared::locale::Locale;

const NOT_FOUND_MESSAGE: &str = "Violation not found";

/// Read side: dashboards, detail pages and timelines
pub struct ViolationService {
    repository: Arc<dyn ViolationRepository>,
    registry: Arc<CategoryRegistry>,
}

impl ViolationService {
    pub fn new(repository: Arc<dyn ViolationRepository>, registry: Arc<CategoryRegistry>) -> Self {
        Self {
            repository,
            registry,
        }
    }

    fn category_name(&self, category_id: i32, locale: Locale) -> String {
        self.registry
            .name_of(category_id)
            .unwrap_or(locale.unknown_category())
            .to_string()
    }

    /// Look up a violation owned by `reporter`. A foreign violation is
    /// reported exactly like a missing one.
    async fn find_owned(&self, reporter: &AuthenticatedUser, id: Uuid) -> Result<Violation> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|v| v.reporter_id == reporter.sub)
            .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))
    }

    async fn find_any(&self, id: Uuid) -> Result<Violation> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))
    }

    pub async fn reporter_dashboard(
        &self,
        reporter: &AuthenticatedUser,
        locale: Locale,
    ) -> Result<ReporterDashboardDto> {
        let violations = self.repository.list_by_reporter(&reporter.sub).await?;
        let counts = TabCountsDto::tally(violations.iter().map(|v| &v.status));

        let ids: Vec<Uuid> = violations.iter().map(|v| v.id).collect();
        let mut thumbnails: HashMap<Uuid, String> = HashMap::new();
        for media in self.repository.list_evidence(&ids).await? {
            // Rows arrive in upload order; the first per violation wins
            thumbnails.entry(media.violation_id).or_insert(media.url);
        }

        let cards = violations
            .into_iter()
            .map(|v| ViolationCardDto {
                category: self.category_name(v.category_id, locale),
                location_address: display_address(&v.location_address, locale),
                thumbnail_url: thumbnails.remove(&v.id),
                status_badge: StatusBadgeDto::new(v.status, locale),
                id: v.id,
                violation_timestamp: v.violation_timestamp,
                status: v.status,
                created_at: v.created_at,
            })
            .collect();

        Ok(ReporterDashboardDto {
            violations: cards,
            counts,
        })
    }

    pub async fn reporter_detail(
        &self,
        reporter: &AuthenticatedUser,
        id: Uuid,
        locale: Locale,
    ) -> Result<ViolationDetailDto> {
        let violation = self.find_owned(reporter, id).await?;
        let mut detail = self.detail(violation, locale).await?;
        detail.timeline = detail.timeline.without_warnings();
        Ok(detail)
    }

    pub async fn reporter_timeline(
        &self,
        reporter: &AuthenticatedUser,
        id: Uuid,
        locale: Locale,
    ) -> Result<TimelineDto> {
        let violation = self.find_owned(reporter, id).await?;
        Ok(self.timeline(violation.id, locale).await?.without_warnings())
    }

    pub async fn authority_list(
        &self,
        limit: i64,
        locale: Locale,
    ) -> Result<Vec<AuthorityViolationDto>> {
        let violations = self.repository.list_recent(limit).await?;

        Ok(violations
            .into_iter()
            .map(|v| AuthorityViolationDto {
                short_id: short_id(&v),
                category: self.category_name(v.category_id, locale),
                location_address: display_address(&v.location_address, locale),
                status_badge: StatusBadgeDto::new(v.status, locale),
                id: v.id,
                reporter_id: v.reporter_id,
                plate_number: v.plate_number,
                status: v.status,
                created_at: v.created_at,
            })
            .collect())
    }

    pub async fn authority_detail(&self, id: Uuid, locale: Locale) -> Result<ViolationDetailDto> {
        let violation = self.find_any(id).await?;
        self.detail(violation, locale).await
    }

    pub fn describe_submission(
        &self,
        outcome: SubmissionOutcome,
        locale: Locale,
    ) -> SubmissionResponseDto {
        let SubmissionOutcome {
            violation,
            evidence,
        } = outcome;

        SubmissionResponseDto {
            category: self.category_name(violation.category_id, locale),
            files_stored: evidence.len(),
            evidence: evidence.into_iter().map(Into::into).collect(),
            id: violation.id,
            location_address: violation.location_address,
            location_lat: violation.location_lat,
            location_lng: violation.location_lng,
            violation_timestamp: violation.violation_timestamp,
            plate_number: violation.plate_number,
            status: violation.status,
            created_at: violation.created_at,
        }
    }

    async fn timeline(&self, violation_id: Uuid, locale: Locale) -> Result<TimelineDto> {
        let updates = self.repository.list_status_updates(violation_id).await?;
        Ok(render_timeline(updates, locale).into())
    }

    async fn detail(&self, violation: Violation, locale: Locale) -> Result<ViolationDetailDto> {
        let evidence: Vec<EvidenceMedia> = self.repository.list_evidence(&[violation.id]).await?;
        let timeline = self.timeline(violation.id, locale).await?;

        Ok(ViolationDetailDto {
            category: self.category_name(violation.category_id, locale),
            status_badge: StatusBadgeDto::new(violation.status, locale),
            evidence: evidence.into_iter().map(EvidenceMediaDto::from).collect(),
            timeline,
            location_address: display_address(&violation.location_address, locale),
            id: violation.id,
            reporter_id: violation.reporter_id,
            category_id: violation.category_id,
            location_lat: violation.location_lat,
            location_lng: violation.location_lng,
            violation_timestamp: violation.violation_timestamp,
            description: violation.description,
            plate_number: violation.plate_number,
            status: violation.status,
            created_at: violation.created_at,
        })
    }
}

fn display_address(address: &str, locale: Locale) -> String {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        locale.location_not_specified().to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::ViolationCategory;
    use crate::features::violations::models::{
        CreateEvidenceMedia, CreateViolation, MediaKind, StatusUpdate, ViolationStatus,
    };
    use crate::features::violations::services::repository::InMemoryViolationRepository;
    use crate::shared::test_helpers::{create_authority_user, create_reporter_user};
    use chrono::{NaiveDate, Utc};

    fn service(repo: Arc<InMemoryViolationRepository>) -> ViolationService {
        let registry = CategoryRegistry::from_categories([ViolationCategory {
            id: 2,
            name: "Illegal Parking".to_string(),
        }]);
        ViolationService::new(repo, Arc::new(registry))
    }

    async fn create(repo: &InMemoryViolationRepository, reporter: &str, category_id: i32) -> Violation {
        repo.create_violation(CreateViolation {
            reporter_id: reporter.to_string(),
            category_id,
            location_lat: None,
            location_lng: None,
            location_address: "Station Road".to_string(),
            violation_timestamp: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(10, 15, 0)
                .unwrap(),
            description: None,
            plate_number: Some("KA01 AB 1234".to_string()),
        })
        .await
        .unwrap()
    }

    async fn attach(repo: &InMemoryViolationRepository, violation_id: Uuid, url: &str) {
        repo.create_evidence(CreateEvidenceMedia {
            violation_id,
            url: url.to_string(),
            kind: MediaKind::Image,
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_dashboard_cards_and_counts() {
        let repo = Arc::new(InMemoryViolationRepository::default());
        let reporter = create_reporter_user();

        let first = create(&repo, &reporter.sub, 2).await;
        let second = create(&repo, &reporter.sub, 77).await;
        create(&repo, "someone-else", 2).await;
        attach(&repo, first.id, "http://s/first-a.jpg").await;
        attach(&repo, first.id, "http://s/first-b.jpg").await;
        repo.append_status(second.id, ViolationStatus::Rejected, None, None)
            .await
            .unwrap();

        let dashboard = service(repo)
            .reporter_dashboard(&reporter, Locale::En)
            .await
            .unwrap();

        assert_eq!(
            dashboard.counts,
            TabCountsDto {
                all: 2,
                pending: 1,
                in_progress: 0,
                closed: 1
            }
        );
        // Newest first
        assert_eq!(dashboard.violations[0].id, second.id);
        assert_eq!(dashboard.violations[0].category, "Unknown");
        assert_eq!(dashboard.violations[0].thumbnail_url, None);
        assert_eq!(dashboard.violations[1].category, "Illegal Parking");
        assert_eq!(
            dashboard.violations[1].thumbnail_url.as_deref(),
            Some("http://s/first-a.jpg")
        );
    }

    #[tokio::test]
    async fn test_empty_dashboard() {
        let dashboard = service(Arc::new(InMemoryViolationRepository::default()))
            .reporter_dashboard(&create_reporter_user(), Locale::En)
            .await
            .unwrap();

        assert!(dashboard.violations.is_empty());
        assert_eq!(dashboard.counts, TabCountsDto::default());
    }

    #[tokio::test]
    async fn test_foreign_violation_reads_as_not_found() {
        let repo = Arc::new(InMemoryViolationRepository::default());
        let foreign = create(&repo, "someone-else", 2).await;
        let service = service(repo);
        let reporter = create_reporter_user();

        let foreign_err = service
            .reporter_detail(&reporter, foreign.id, Locale::En)
            .await
            .unwrap_err();
        let missing_err = service
            .reporter_detail(&reporter, Uuid::now_v7(), Locale::En)
            .await
            .unwrap_err();

        assert_eq!(foreign_err.to_string(), missing_err.to_string());
        assert!(matches!(foreign_err, AppError::NotFound(_)));

        // Authorities see every violation
        let detail = service
            .authority_detail(foreign.id, Locale::En)
            .await
            .unwrap();
        assert_eq!(detail.reporter_id, "someone-else");
    }

    #[tokio::test]
    async fn test_detail_embeds_empty_timeline() {
        let repo = Arc::new(InMemoryViolationRepository::default());
        let reporter = create_reporter_user();
        let violation = create(&repo, &reporter.sub, 2).await;

        let detail = service(repo)
            .reporter_detail(&reporter, violation.id, Locale::Es)
            .await
            .unwrap();

        match detail.timeline {
            TimelineDto::Empty { message } => {
                assert_eq!(message, Locale::Es.no_status_updates())
            }
            other => panic!("expected empty timeline, got {:?}", other),
        }
        assert_eq!(detail.status_badge.label, "Pendiente");
    }

    #[tokio::test]
    async fn test_timeline_sorted_after_appends() {
        let repo = Arc::new(InMemoryViolationRepository::default());
        let reporter = create_reporter_user();
        let violation = create(&repo, &reporter.sub, 2).await;
        let authority = create_authority_user();

        // Legacy row written out of order
        repo.insert_update(StatusUpdate {
            id: 100,
            violation_id: violation.id,
            previous_status: Some("pending".to_string()),
            new_status: "In Progress".to_string(),
            comment: None,
            created_by: None,
            created_at: Utc::now() - chrono::Duration::hours(1),
        })
        .await;
        repo.append_status(
            violation.id,
            ViolationStatus::Resolved,
            Some("Fine issued".to_string()),
            Some(authority.sub.clone()),
        )
        .await
        .unwrap();

        let timeline = service(repo)
            .reporter_timeline(&reporter, violation.id, Locale::En)
            .await
            .unwrap();

        let TimelineDto::Entries { entries, .. } = timeline else {
            panic!("expected entries");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].icon_class, "in-progress-icon");
        assert_eq!(entries[0].previous_status, None);
        assert_eq!(entries[1].new_status, "resolved");
        assert_eq!(entries[1].comment.as_deref(), Some("Fine issued"));
        assert!(entries[1].is_last);
    }

    #[tokio::test]
    async fn test_integrity_warnings_reach_authorities_only() {
        let repo = Arc::new(InMemoryViolationRepository::default());
        let reporter = create_reporter_user();
        let violation = create(&repo, &reporter.sub, 2).await;
        repo.append_status(violation.id, ViolationStatus::Resolved, None, None)
            .await
            .unwrap();
        repo.append_status(violation.id, ViolationStatus::InProgress, None, None)
            .await
            .unwrap();
        let service = service(repo);

        let authority_view = service
            .authority_detail(violation.id, Locale::En)
            .await
            .unwrap();
        let TimelineDto::Entries { warnings, .. } = authority_view.timeline else {
            panic!("expected entries");
        };
        assert!(!warnings.is_empty());

        let timeline = service
            .reporter_timeline(&reporter, violation.id, Locale::En)
            .await
            .unwrap();
        let json = serde_json::to_value(&timeline).unwrap();
        assert_eq!(json["entries"].as_array().map(Vec::len), Some(2));
        assert!(json.get("warnings").is_none());

        let detail = service
            .reporter_detail(&reporter, violation.id, Locale::En)
            .await
            .unwrap();
        let TimelineDto::Entries { warnings, .. } = detail.timeline else {
            panic!("expected entries");
        };
        assert!(warnings.is_empty());
    }

    #[tokio::test]
    async fn test_authority_list_limit_and_short_id() {
        let repo = Arc::new(InMemoryViolationRepository::default());
        for i in 0..3 {
            create(&repo, &format!("reporter-{}", i), 2).await;
        }

        let rows = service(repo).authority_list(2, Locale::En).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].reporter_id, "reporter-2");
        assert_eq!(rows[0].short_id.len(), 8);
        assert!(rows[0].id.simple().to_string().starts_with(&rows[0].short_id));
    }
}
