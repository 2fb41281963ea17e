pub mod geocoding_service;
pub mod repository;
pub mod submission;
pub mod timeline;

mod status_log_service;
mod submission_service;
mod violation_service;

pub use geocoding_service::{DisabledGeocoder, NominatimGeocoder, ReverseGeocoder};
pub use repository::{PgViolationRepository, ViolationRepository};
pub use status_log_service::{AppendOutcome, StatusLogService};
pub use submission::{coordinates_in_range, EvidenceFile, MAX_EVIDENCE_FILES};
pub use submission_service::SubmissionService;
pub use violation_service::ViolationService;
