use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::violations::models::{StatusUpdate, Violation, ViolationStatus};
use crate::features::violations::services::repository::{AppendedStatus, ViolationRepository};
use crate::features::violations::services::timeline::{check_transition, IntegrityWarning};

/// Outcome of an append: the violation now carries `update.new_status`
#[derive(Debug, Clone)]
pub struct AppendOutcome {
    pub violation: Violation,
    pub update: StatusUpdate,
    /// Set when the transition left a terminal status or is not allowed by
    /// the lifecycle. The append is recorded regardless.
    pub warning: Option<IntegrityWarning>,
}

/// Writes to the append-only status log
pub struct StatusLogService {
    repository: Arc<dyn ViolationRepository>,
}

impl StatusLogService {
    pub fn new(repository: Arc<dyn ViolationRepository>) -> Self {
        Self { repository }
    }

    pub async fn append_status(
        &self,
        violation_id: Uuid,
        new_status: ViolationStatus,
        comment: Option<String>,
        actor: &AuthenticatedUser,
    ) -> Result<AppendOutcome> {
        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let AppendedStatus { violation, update } = self
            .repository
            .append_status(violation_id, new_status, comment, Some(actor.sub.clone()))
            .await?;

        let previous = update.previous_status.as_deref().unwrap_or_default();
        let warning = check_transition(previous, &update);

        match &warning {
            Some(warning) => tracing::warn!(
                violation_id = %violation_id,
                actor = %actor.sub,
                "Status appended with integrity warning: {}",
                warning
            ),
            None => tracing::info!(
                violation_id = %violation_id,
                actor = %actor.sub,
                "Violation status {} -> {}",
                previous,
                update.new_status
            ),
        }

        Ok(AppendOutcome {
            violation,
            update,
            warning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::features::violations::models::CreateViolation;
    use crate::features::violations::services::repository::InMemoryViolationRepository;
    use crate::shared::test_helpers::create_authority_user;
    use chrono::NaiveDate;

    async fn seeded() -> (Arc<InMemoryViolationRepository>, Uuid) {
        let repo = Arc::new(InMemoryViolationRepository::default());
        let violation = repo
            .create_violation(CreateViolation {
                reporter_id: "reporter".to_string(),
                category_id: 1,
                location_lat: None,
                location_lng: None,
                location_address: "Ring Road".to_string(),
                violation_timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap(),
                description: None,
                plate_number: None,
            })
            .await
            .unwrap();
        (repo, violation.id)
    }

    #[tokio::test]
    async fn test_append_moves_violation_status() {
        let (repo, id) = seeded().await;
        let service = StatusLogService::new(repo.clone());

        let outcome = service
            .append_status(
                id,
                ViolationStatus::InProgress,
                Some("  Officer assigned ".to_string()),
                &create_authority_user(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.violation.status, ViolationStatus::InProgress);
        assert_eq!(outcome.update.previous_status.as_deref(), Some("pending"));
        assert_eq!(outcome.update.new_status, "in_progress");
        assert_eq!(outcome.update.comment.as_deref(), Some("Officer assigned"));
        assert_eq!(outcome.update.created_by.as_deref(), Some("authority-sub"));
        assert!(outcome.warning.is_none());

        let stored = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.status, ViolationStatus::InProgress);
    }

    #[tokio::test]
    async fn test_post_terminal_append_is_recorded_with_warning() {
        let (repo, id) = seeded().await;
        let service = StatusLogService::new(repo.clone());
        let actor = create_authority_user();

        service
            .append_status(id, ViolationStatus::Resolved, None, &actor)
            .await
            .unwrap();
        let outcome = service
            .append_status(id, ViolationStatus::InProgress, Some("   ".to_string()), &actor)
            .await
            .unwrap();

        assert_eq!(outcome.violation.status, ViolationStatus::InProgress);
        assert!(outcome.update.comment.is_none());
        assert!(matches!(
            outcome.warning,
            Some(IntegrityWarning::AfterTerminal { .. })
        ));
        assert_eq!(repo.list_status_updates(id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_disallowed_transition_warns() {
        let (repo, id) = seeded().await;
        let service = StatusLogService::new(repo);

        let outcome = service
            .append_status(id, ViolationStatus::Pending, None, &create_authority_user())
            .await
            .unwrap();

        assert!(matches!(
            outcome.warning,
            Some(IntegrityWarning::DisallowedTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_violation_is_not_found() {
        let service = StatusLogService::new(Arc::new(InMemoryViolationRepository::default()));

        let result = service
            .append_status(
                Uuid::now_v7(),
                ViolationStatus::Resolved,
                None,
                &create_authority_user(),
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
