use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::violations::services::timeline::{Timeline, TimelineEntry};

/// Rendered status timeline. `state` is `empty` (show `message`) or
/// `entries`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TimelineDto {
    Empty {
        message: String,
    },
    Entries {
        entries: Vec<TimelineEntryDto>,
        /// Log inconsistencies, for display to authorities only
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimelineEntryDto {
    pub id: i64,
    pub new_status: String,
    pub label: String,
    pub icon_class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<String>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Front ends draw the connector line below every entry but the last
    pub is_last: bool,
}

impl From<TimelineEntry<'_>> for TimelineEntryDto {
    fn from(entry: TimelineEntry<'_>) -> Self {
        Self {
            id: entry.id,
            new_status: entry.new_status.to_string(),
            label: entry.label.to_string(),
            icon_class: entry.icon_class.to_string(),
            previous_status: entry.previous_status.map(str::to_string),
            comment: entry.comment.map(str::to_string),
            created_at: entry.created_at,
            is_last: entry.is_last,
        }
    }
}

impl TimelineDto {
    /// Drop authority diagnostics before handing the timeline to a reporter
    pub fn without_warnings(self) -> Self {
        match self {
            TimelineDto::Entries { entries, .. } => TimelineDto::Entries {
                entries,
                warnings: Vec::new(),
            },
            empty => empty,
        }
    }
}

impl From<Timeline> for TimelineDto {
    fn from(timeline: Timeline) -> Self {
        match timeline {
            Timeline::Empty { message } => TimelineDto::Empty {
                message: message.to_string(),
            },
            Timeline::Entries(view) => {
                let mut entries = Vec::with_capacity(view.entry_count());
                entries.extend(view.entries().map(TimelineEntryDto::from));
                TimelineDto::Entries {
                    entries,
                    warnings: view.warnings().iter().map(ToString::to_string).collect(),
                }
            }
        }
    }
}
