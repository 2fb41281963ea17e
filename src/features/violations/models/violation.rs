use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::locale::Locale;

/// Violation status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "violation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ViolationStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl std::fmt::Display for ViolationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ViolationStatus {
    /// Status every violation starts in
    pub const INITIAL: ViolationStatus = ViolationStatus::Pending;

    pub fn as_str(self) -> &'static str {
        match self {
            ViolationStatus::Pending => "pending",
            ViolationStatus::InProgress => "in_progress",
            ViolationStatus::Resolved => "resolved",
            ViolationStatus::Rejected => "rejected",
        }
    }

    /// Case-insensitive parse that accepts `in progress`, `in_progress`
    /// and `in-progress` spellings. Unknown values yield `None`.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "pending" => Some(ViolationStatus::Pending),
            "in_progress" => Some(ViolationStatus::InProgress),
            "resolved" => Some(ViolationStatus::Resolved),
            "rejected" => Some(ViolationStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ViolationStatus::Resolved | ViolationStatus::Rejected)
    }

    /// Transitions the lifecycle allows:
    /// pending → in_progress | resolved | rejected,
    /// in_progress → resolved | rejected.
    pub fn can_transition_to(self, next: ViolationStatus) -> bool {
        use ViolationStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress)
                | (Pending, Resolved)
                | (Pending, Rejected)
                | (InProgress, Resolved)
                | (InProgress, Rejected)
        )
    }

    pub fn label(self, locale: Locale) -> &'static str {
        locale.status_label(self.as_str()).unwrap_or(self.as_str())
    }

    pub fn icon_class(self) -> &'static str {
        match self {
            ViolationStatus::Pending => "pending-icon",
            ViolationStatus::InProgress => "in-progress-icon",
            ViolationStatus::Resolved => "resolved-icon",
            ViolationStatus::Rejected => "rejected-icon",
        }
    }

    pub fn badge_color(self) -> &'static str {
        match self {
            ViolationStatus::Pending => "yellow",
            ViolationStatus::InProgress => "blue",
            ViolationStatus::Resolved => "green",
            ViolationStatus::Rejected => "red",
        }
    }
}

/// Database model for violation
#[derive(Debug, Clone, FromRow)]
pub struct Violation {
    pub id: Uuid,
    pub reporter_id: String,
    pub category_id: i32,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub location_address: String,
    pub violation_timestamp: NaiveDateTime,
    pub description: Option<String>,
    pub plate_number: Option<String>,
    pub status: ViolationStatus,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new violation. Status always starts at `pending`.
#[derive(Debug, Clone)]
pub struct CreateViolation {
    pub reporter_id: String,
    pub category_id: i32,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub location_address: String,
    pub violation_timestamp: NaiveDateTime,
    pub description: Option<String>,
    pub plate_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ViolationStatus::*;

    #[test]
    fn test_parse_lenient() {
        assert_eq!(ViolationStatus::parse_lenient("In Progress"), Some(InProgress));
        assert_eq!(ViolationStatus::parse_lenient("in-progress"), Some(InProgress));
        assert_eq!(ViolationStatus::parse_lenient("IN_PROGRESS"), Some(InProgress));
        assert_eq!(ViolationStatus::parse_lenient(" Resolved "), Some(Resolved));
        assert_eq!(ViolationStatus::parse_lenient("archived"), None);
    }

    #[test]
    fn test_transitions() {
        assert!(Pending.can_transition_to(InProgress));
        assert!(Pending.can_transition_to(Rejected));
        assert!(InProgress.can_transition_to(Resolved));
        assert!(!InProgress.can_transition_to(Pending));
        assert!(!Resolved.can_transition_to(InProgress));
        assert!(!Rejected.can_transition_to(Resolved));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_terminal_and_display() {
        assert!(Resolved.is_terminal());
        assert!(Rejected.is_terminal());
        assert!(!InProgress.is_terminal());
        assert_eq!(InProgress.to_string(), "in_progress");
        assert_eq!(InProgress.label(Locale::En), "In Progress");
        assert_eq!(Rejected.label(Locale::Es), "Rechazado");
    }
}
