use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::config::SubmissionConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::categories::CategoryRegistry;
use crate::features::violations::models::{
    CreateEvidenceMedia, CreateViolation, EvidenceMedia, Violation,
};
use crate::features::violations::services::geocoding_service::{
    format_coordinates, lookup_place_name, ReverseGeocoder,
};
use crate::features::violations::services::repository::ViolationRepository;
use crate::features::violations::services::submission::{
    EvidenceFile, SubmissionDraft, ValidatedSubmission,
};
use crate::modules::storage::ObjectStorage;
use crate::shared::constants::EVIDENCE_STORAGE_PURPOSE;

/// A stored violation and the evidence recorded for it
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub violation: Violation,
    pub evidence: Vec<EvidenceMedia>,
}

/// Validates drafts and persists them as violations with evidence
pub struct SubmissionService {
    repository: Arc<dyn ViolationRepository>,
    storage: Arc<dyn ObjectStorage>,
    geocoder: Arc<dyn ReverseGeocoder>,
    registry: Arc<CategoryRegistry>,
    limits: SubmissionConfig,
}

impl SubmissionService {
    pub fn new(
        repository: Arc<dyn ViolationRepository>,
        storage: Arc<dyn ObjectStorage>,
        geocoder: Arc<dyn ReverseGeocoder>,
        registry: Arc<CategoryRegistry>,
        limits: SubmissionConfig,
    ) -> Self {
        Self {
            repository,
            storage,
            geocoder,
            registry,
            limits,
        }
    }

    /// Empty draft carrying this service's evidence limits
    pub fn new_draft(&self) -> SubmissionDraft {
        SubmissionDraft::new(&self.limits)
    }

    /// Validate, then create the violation (pending) and store each
    /// evidence file in order. The first upload or insert failure stops the
    /// remaining files; records already written stay.
    pub async fn submit(
        &self,
        reporter: &AuthenticatedUser,
        draft: SubmissionDraft,
    ) -> Result<SubmissionOutcome> {
        let submission = draft.validate(&self.registry, Utc::now().naive_utc())?;
        let location_address = self.resolve_address(&submission).await;

        let ValidatedSubmission {
            category_id,
            violation_timestamp,
            coordinates,
            plate_number,
            description,
            evidence: files,
            ..
        } = submission;

        let violation = self
            .repository
            .create_violation(CreateViolation {
                reporter_id: reporter.sub.clone(),
                category_id,
                location_lat: coordinates.map(|(lat, _)| lat),
                location_lng: coordinates.map(|(_, lng)| lng),
                location_address,
                violation_timestamp,
                description,
                plate_number,
            })
            .await?;

        tracing::info!(
            violation_id = %violation.id,
            reporter = %reporter.sub,
            files = files.len(),
            "Violation created"
        );

        let mut evidence = Vec::with_capacity(files.len());
        for file in files {
            let media = self.store_evidence(&violation, file).await?;
            evidence.push(media);
        }

        Ok(SubmissionOutcome {
            violation,
            evidence,
        })
    }

    /// With coordinates the typed address is display-only: a resolved place
    /// name wins, else the typed address, else the formatted coordinates.
    async fn resolve_address(&self, submission: &ValidatedSubmission) -> String {
        let Some((lat, lng)) = submission.coordinates else {
            return submission.location_address.clone();
        };

        if let Some(place) = lookup_place_name(self.geocoder.as_ref(), lat, lng).await {
            return place;
        }

        if submission.location_address.is_empty() {
            format_coordinates(lat, lng)
        } else {
            submission.location_address.clone()
        }
    }

    async fn store_evidence(
        &self,
        violation: &Violation,
        file: EvidenceFile,
    ) -> Result<EvidenceMedia> {
        // Checked on insert into the evidence set
        let kind = file.kind().ok_or_else(|| {
            AppError::Validation(format!("'{}' is not a photo or video.", file.file_name))
        })?;

        let path = evidence_path(&violation.reporter_id, violation.id, &file.extension());
        tracing::debug!("Uploading evidence '{}' as {}", file.file_name, path);

        let url = self
            .storage
            .upload_public(&path, file.data, &file.content_type)
            .await?;

        self.repository
            .create_evidence(CreateEvidenceMedia {
                violation_id: violation.id,
                url,
                kind,
            })
            .await
    }
}

/// `violations/{reporter_id}/{violation_id}/{uuid}.{ext}`
fn evidence_path(reporter_id: &str, violation_id: Uuid, extension: &str) -> String {
    format!(
        "{}/{}/{}/{}.{}",
        EVIDENCE_STORAGE_PURPOSE,
        reporter_id,
        violation_id,
        Uuid::new_v4(),
        extension
    )
}
