//! Submission draft and its validation.
//!
//! A draft is filled field by field from the multipart form and validated in
//! one pass; every problem found ends up in a single user-facing message.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::core::config::SubmissionConfig;
use crate::core::error::AppError;
use crate::features::categories::CategoryRegistry;
use crate::features::violations::models::MediaKind;
use crate::shared::validation::{normalize_plate_number, PLATE_NUMBER_REGEX};

/// Hard upper bound on evidence files per violation
pub const MAX_EVIDENCE_FILES: usize = 5;

const MISSING_REQUIRED_MESSAGE: &str =
    "Please fill all required fields and upload at least one photo/video.";

/// One uploaded evidence file, held in memory until stored
#[derive(Debug, Clone)]
pub struct EvidenceFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl EvidenceFile {
    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::from_content_type(&self.content_type)
    }

    /// Extension used for the storage key: taken from the file name,
    /// else derived from the content subtype
    pub fn extension(&self) -> String {
        let from_name = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

        let from_type = || {
            self.content_type
                .split_once('/')
                .map(|(_, sub)| sub.split(['+', ';']).next().unwrap_or(sub).trim())
                .filter(|sub| !sub.is_empty() && sub.chars().all(|c| c.is_ascii_alphanumeric()))
        };

        from_name
            .or_else(from_type)
            .unwrap_or("bin")
            .to_ascii_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvidenceError {
    #[error("At most {max} evidence files can be attached.")]
    TooMany { max: usize },

    #[error("'{name}' is not a photo or video.")]
    UnsupportedType { name: String },

    #[error("'{name}' exceeds the {limit_mb} MB file size limit.")]
    TooLarge { name: String, limit_mb: usize },

    #[error("'{name}' is empty.")]
    Empty { name: String },
}

/// Bounded, ordered collection of evidence files.
///
/// Insertion validates type, size and the file-count bound; a rejected file
/// leaves the set unchanged.
#[derive(Debug, Clone)]
pub struct EvidenceSet {
    files: Vec<EvidenceFile>,
    max_files: usize,
    max_file_size: usize,
}

impl EvidenceSet {
    pub fn new(limits: &SubmissionConfig) -> Self {
        Self {
            files: Vec::new(),
            max_files: limits.max_files.clamp(1, MAX_EVIDENCE_FILES),
            max_file_size: limits.max_file_size,
        }
    }

    pub fn try_push(&mut self, file: EvidenceFile) -> Result<(), EvidenceError> {
        if self.files.len() >= self.max_files {
            return Err(EvidenceError::TooMany {
                max: self.max_files,
            });
        }
        if file.kind().is_none() {
            return Err(EvidenceError::UnsupportedType {
                name: file.file_name,
            });
        }
        if file.data.is_empty() {
            return Err(EvidenceError::Empty {
                name: file.file_name,
            });
        }
        if file.data.len() > self.max_file_size {
            return Err(EvidenceError::TooLarge {
                name: file.file_name,
                limit_mb: self.max_file_size / 1024 / 1024,
            });
        }

        self.files.push(file);
        Ok(())
    }

    /// Drop the file at `index`; out-of-range indices are a no-op.
    ///
    /// Reporters edit their selection client-side before posting, so the
    /// server never removes evidence; only tests exercise this.
    #[cfg(test)]
    pub fn remove(&mut self, index: usize) -> Option<EvidenceFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_files(self) -> Vec<EvidenceFile> {
        self.files
    }
}

/// Raw form input, exactly as received
#[derive(Debug, Clone)]
pub struct SubmissionDraft {
    pub category_id: Option<String>,
    pub violation_date: Option<String>,
    pub violation_time: Option<String>,
    pub location_address: Option<String>,
    pub location_lat: Option<String>,
    pub location_lng: Option<String>,
    pub plate_number: Option<String>,
    pub description: Option<String>,
    pub evidence: EvidenceSet,
    rejected_evidence: Vec<EvidenceError>,
}

/// A draft that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    pub category_id: i32,
    pub violation_timestamp: NaiveDateTime,
    /// Trimmed user address; may be empty when coordinates were given
    pub location_address: String,
    pub coordinates: Option<(f64, f64)>,
    pub plate_number: Option<String>,
    pub description: Option<String>,
    pub evidence: Vec<EvidenceFile>,
}

impl SubmissionDraft {
    pub fn new(limits: &SubmissionConfig) -> Self {
        Self {
            category_id: None,
            violation_date: None,
            violation_time: None,
            location_address: None,
            location_lat: None,
            location_lng: None,
            plate_number: None,
            description: None,
            evidence: EvidenceSet::new(limits),
            rejected_evidence: Vec::new(),
        }
    }

    /// Store a text form field. Returns `false` for unknown field names.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let value = Some(value).filter(|v| !v.trim().is_empty());
        let slot = match name {
            "category_id" => &mut self.category_id,
            "violation_date" => &mut self.violation_date,
            "violation_time" => &mut self.violation_time,
            "location_address" => &mut self.location_address,
            "location_lat" => &mut self.location_lat,
            "location_lng" => &mut self.location_lng,
            "plate_number" => &mut self.plate_number,
            "description" => &mut self.description,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Add an evidence file; a rejection is remembered and reported by
    /// `validate` together with every other problem.
    pub fn attach(&mut self, file: EvidenceFile) {
        if let Err(err) = self.evidence.try_push(file) {
            self.rejected_evidence.push(err);
        }
    }

    /// Validate against the category registry. `now` bounds the violation
    /// date (a violation cannot be reported for a future day).
    pub fn validate(
        self,
        registry: &CategoryRegistry,
        now: NaiveDateTime,
    ) -> Result<ValidatedSubmission, AppError> {
        let mut missing_required = false;
        let mut problems: Vec<String> = Vec::new();

        let category_id = match self.category_id.as_deref().map(str::trim) {
            None => {
                missing_required = true;
                None
            }
            Some(raw) => match raw.parse::<i32>().ok().filter(|id| registry.contains(*id)) {
                Some(id) => Some(id),
                None => {
                    problems.push("Selected violation type does not exist.".to_string());
                    None
                }
            },
        };

        let date = match self.violation_date.as_deref().map(str::trim) {
            None => {
                missing_required = true;
                None
            }
            Some(raw) => {
                let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
                if parsed.is_none() {
                    problems.push("Date of violation must be in YYYY-MM-DD format.".to_string());
                }
                parsed
            }
        };

        let time = match self.violation_time.as_deref().map(str::trim) {
            None => {
                missing_required = true;
                None
            }
            Some(raw) => {
                let parsed = NaiveTime::parse_from_str(raw, "%H:%M")
                    .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
                    .ok();
                if parsed.is_none() {
                    problems.push("Time of violation must be in HH:MM format.".to_string());
                }
                parsed
            }
        };

        if let Some(date) = date {
            if date > now.date() {
                problems.push("Date of violation cannot be in the future.".to_string());
            }
        }

        let coordinates = match (self.location_lat.as_deref(), self.location_lng.as_deref()) {
            (None, None) => None,
            (Some(lat), Some(lng)) => {
                let parsed = lat
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .zip(lng.trim().parse::<f64>().ok())
                    .filter(|(lat, lng)| coordinates_in_range(*lat, *lng));
                if parsed.is_none() {
                    problems.push("Location coordinates are invalid.".to_string());
                }
                parsed
            }
            _ => {
                problems.push("Location coordinates are incomplete.".to_string());
                None
            }
        };

        let location_address = self
            .location_address
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        // Coordinates stand in for a typed address
        if location_address.is_empty() && coordinates.is_none() {
            missing_required = true;
        }

        if self.evidence.is_empty() {
            missing_required = true;
        }
        problems.extend(self.rejected_evidence.iter().map(ToString::to_string));

        let plate_number = self.plate_number.as_deref().and_then(normalize_plate_number);
        if let Some(plate) = &plate_number {
            if !PLATE_NUMBER_REGEX.is_match(plate) {
                problems.push(format!("'{}' is not a valid plate number.", plate));
            }
        }

        if missing_required {
            problems.insert(0, MISSING_REQUIRED_MESSAGE.to_string());
        }

        match (category_id, date, time) {
            (Some(category_id), Some(date), Some(time)) if problems.is_empty() => {
                Ok(ValidatedSubmission {
                    category_id,
                    violation_timestamp: date.and_time(time),
                    location_address,
                    coordinates,
                    plate_number,
                    description: self
                        .description
                        .map(|d| d.trim().to_string())
                        .filter(|d| !d.is_empty()),
                    evidence: self.evidence.into_files(),
                })
            }
            _ => Err(AppError::Validation(problems.join(" "))),
        }
    }
}

pub fn coordinates_in_range(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}
