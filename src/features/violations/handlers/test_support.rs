use std::sync::Arc;

use async_trait::async_trait;

use crate::core::config::SubmissionConfig;
use crate::core::error::{AppError, Result};
use crate::features::categories::models::{CategoryRegistry, ViolationCategory};
use crate::features::violations::handlers::ViolationState;
use crate::features::violations::services::repository::InMemoryViolationRepository;
use crate::features::violations::services::{
    DisabledGeocoder, ReverseGeocoder, StatusLogService, SubmissionService, ViolationService,
};
use crate::modules::storage::ObjectStorage;

/// Accepts every upload and hands back a fake public URL
pub struct AcceptingStorage;

#[async_trait]
impl ObjectStorage for AcceptingStorage {
    async fn upload_public(&self, path: &str, _data: Vec<u8>, _content_type: &str) -> Result<String> {
        Ok(format!("http://storage.test/public/{}", path))
    }
}

/// Knows a single place for positive latitudes, fails for negative ones
pub struct StubGeocoder;

#[async_trait]
impl ReverseGeocoder for StubGeocoder {
    async fn reverse(&self, lat: f64, _lng: f64) -> Result<Option<String>> {
        if lat < 0.0 {
            return Err(AppError::ExternalServiceError("upstream timeout".to_string()));
        }
        if lat > 0.0 {
            return Ok(Some("Koramangala, Bengaluru".to_string()));
        }
        Ok(None)
    }
}

pub struct TestContext {
    pub state: ViolationState,
    pub repo: Arc<InMemoryViolationRepository>,
}

pub fn state_with_geocoder(geocoder: Arc<dyn ReverseGeocoder>) -> TestContext {
    let repo = Arc::new(InMemoryViolationRepository::default());
    let registry = Arc::new(CategoryRegistry::from_categories([
        ViolationCategory {
            id: 1,
            name: "Signal Jumping".to_string(),
        },
        ViolationCategory {
            id: 2,
            name: "Illegal Parking".to_string(),
        },
    ]));

    let state = ViolationState {
        submission_service: Arc::new(SubmissionService::new(
            repo.clone(),
            Arc::new(AcceptingStorage),
            geocoder.clone(),
            registry.clone(),
            SubmissionConfig::default(),
        )),
        violation_service: Arc::new(ViolationService::new(repo.clone(), registry)),
        status_log_service: Arc::new(StatusLogService::new(repo.clone())),
        geocoder,
    };

    TestContext { state, repo }
}

pub fn state() -> TestContext {
    state_with_geocoder(Arc::new(DisabledGeocoder))
}
