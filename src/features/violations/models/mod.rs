mod evidence_media;
mod status_update;
mod violation;

pub use evidence_media::{CreateEvidenceMedia, EvidenceMedia, MediaKind};
pub use status_update::StatusUpdate;
pub use violation::{CreateViolation, Violation, ViolationStatus};
