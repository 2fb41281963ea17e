//! Display-ready view of a violation's status log.
//!
//! Rendering never fails: unknown status strings fall back to a neutral icon
//! and their raw text, and inconsistencies in the log surface as
//! [`IntegrityWarning`]s next to the entries.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::features::violations::models::{StatusUpdate, ViolationStatus};
use crate::shared::locale::Locale;

pub const UNKNOWN_ICON: &str = "unknown-icon";

/// Icon class for a raw status string (case-insensitive; space, hyphen and
/// underscore spellings of "in progress" are equivalent)
pub fn icon_class(raw_status: &str) -> &'static str {
    ViolationStatus::parse_lenient(raw_status)
        .map(ViolationStatus::icon_class)
        .unwrap_or(UNKNOWN_ICON)
}

/// A log inconsistency detected while rendering or appending
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityWarning {
    /// `previous_status` does not match the status before this entry
    ChainBreak {
        update_id: i64,
        expected: String,
        found: Option<String>,
    },
    /// Entry appended after the violation reached a terminal status
    AfterTerminal { update_id: i64, terminal: String },
    /// Transition the lifecycle does not allow (e.g. back to pending)
    DisallowedTransition {
        update_id: i64,
        from: String,
        to: String,
    },
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityWarning::ChainBreak {
                update_id,
                expected,
                found,
            } => write!(
                f,
                "status update {} records previous status '{}' but the violation was '{}'",
                update_id,
                found.as_deref().unwrap_or("none"),
                expected
            ),
            IntegrityWarning::AfterTerminal {
                update_id,
                terminal,
            } => write!(
                f,
                "status update {} follows terminal status '{}'",
                update_id, terminal
            ),
            IntegrityWarning::DisallowedTransition {
                update_id,
                from,
                to,
            } => write!(
                f,
                "status update {} moves '{}' to '{}', which is not an allowed transition",
                update_id, from, to
            ),
        }
    }
}

/// Check one transition `from → update.new_status`. Unknown statuses are
/// never flagged as disallowed.
pub fn check_transition(from: &str, update: &StatusUpdate) -> Option<IntegrityWarning> {
    let from_status = ViolationStatus::parse_lenient(from);
    let to_status = ViolationStatus::parse_lenient(&update.new_status);

    if let Some(from_status) = from_status.filter(|s| s.is_terminal()) {
        return Some(IntegrityWarning::AfterTerminal {
            update_id: update.id,
            terminal: from_status.as_str().to_string(),
        });
    }

    match (from_status, to_status) {
        (Some(a), Some(b)) if !a.can_transition_to(b) => {
            Some(IntegrityWarning::DisallowedTransition {
                update_id: update.id,
                from: a.as_str().to_string(),
                to: b.as_str().to_string(),
            })
        }
        _ => None,
    }
}

fn same_status(a: &str, b: &str) -> bool {
    match (
        ViolationStatus::parse_lenient(a),
        ViolationStatus::parse_lenient(b),
    ) {
        (Some(a), Some(b)) => a == b,
        _ => a.trim().eq_ignore_ascii_case(b.trim()),
    }
}

/// Walk an ordered log from the initial status and collect every warning
fn integrity_warnings(updates: &[StatusUpdate]) -> Vec<IntegrityWarning> {
    let mut warnings = Vec::new();
    let mut current: &str = ViolationStatus::INITIAL.as_str();

    for update in updates {
        let recorded = update.previous_status.as_deref();
        if !recorded.is_some_and(|prev| same_status(prev, current)) {
            warnings.push(IntegrityWarning::ChainBreak {
                update_id: update.id,
                expected: current.to_string(),
                found: recorded.map(str::to_string),
            });
        }

        warnings.extend(check_transition(current, update));
        current = update.new_status.as_str();
    }

    warnings
}

/// Result of rendering a status log
#[derive(Debug, Clone)]
pub enum Timeline {
    /// No updates recorded; carries the localized message to show instead
    Empty { message: &'static str },
    Entries(TimelineView),
}

/// Non-empty, ordered status log
#[derive(Debug, Clone)]
pub struct TimelineView {
    updates: Vec<StatusUpdate>,
    locale: Locale,
    warnings: Vec<IntegrityWarning>,
}

/// One rendered row
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry<'a> {
    pub id: i64,
    pub new_status: &'a str,
    pub label: &'a str,
    pub icon_class: &'static str,
    /// Only set for entries after the first
    pub previous_status: Option<&'a str>,
    pub comment: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub is_last: bool,
}

impl TimelineView {
    /// Fresh iterator over the entries, oldest first. Each call restarts
    /// from the beginning.
    pub fn entries(&self) -> impl Iterator<Item = TimelineEntry<'_>> + '_ {
        let last = self.updates.len() - 1;
        self.updates.iter().enumerate().map(move |(index, update)| {
            let label = ViolationStatus::parse_lenient(&update.new_status)
                .map(|status| status.label(self.locale))
                .unwrap_or(update.new_status.as_str());

            TimelineEntry {
                id: update.id,
                new_status: &update.new_status,
                label,
                icon_class: icon_class(&update.new_status),
                previous_status: if index == 0 {
                    None
                } else {
                    update.previous_status.as_deref()
                },
                comment: update.comment.as_deref(),
                created_at: update.created_at,
                is_last: index == last,
            }
        })
    }

    pub fn entry_count(&self) -> usize {
        self.updates.len()
    }

    pub fn warnings(&self) -> &[IntegrityWarning] {
        &self.warnings
    }
}

/// Sort a violation's status updates by `created_at` (ties by id, stable)
/// and wrap them for display.
pub fn render_timeline(mut updates: Vec<StatusUpdate>, locale: Locale) -> Timeline {
    if updates.is_empty() {
        return Timeline::Empty {
            message: locale.no_status_updates(),
        };
    }

    updates.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    let warnings = integrity_warnings(&updates);
    for warning in &warnings {
        tracing::warn!(violation_id = %updates[0].violation_id, "{}", warning);
    }

    Timeline::Entries(TimelineView {
        updates,
        locale,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn update(id: i64, prev: Option<&str>, new: &str, secs: i64) -> StatusUpdate {
        StatusUpdate {
            id,
            violation_id: Uuid::nil(),
            previous_status: prev.map(str::to_string),
            new_status: new.to_string(),
            comment: None,
            created_by: None,
            created_at: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
        }
    }

    fn view(timeline: Timeline) -> TimelineView {
        match timeline {
            Timeline::Entries(view) => view,
            Timeline::Empty { .. } => panic!("expected entries"),
        }
    }

    #[test]
    fn test_empty_log_renders_empty_state() {
        match render_timeline(Vec::new(), Locale::Es) {
            Timeline::Empty { message } => {
                assert_eq!(message, Locale::Es.no_status_updates())
            }
            Timeline::Entries(_) => panic!("expected empty state"),
        }
    }

    #[test]
    fn test_two_step_log_renders_in_order() {
        let view = view(render_timeline(
            vec![
                update(2, Some("in_progress"), "resolved", 2),
                update(1, Some("pending"), "in_progress", 1),
            ],
            Locale::En,
        ));

        let entries: Vec<_> = view.entries().collect();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].new_status, "in_progress");
        assert_eq!(entries[0].label, "In Progress");
        assert_eq!(entries[0].icon_class, "in-progress-icon");
        assert_eq!(entries[0].previous_status, None);
        assert!(!entries[0].is_last);

        assert_eq!(entries[1].new_status, "resolved");
        assert_eq!(entries[1].previous_status, Some("in_progress"));
        assert_eq!(entries[1].icon_class, "resolved-icon");
        assert!(entries[1].is_last);

        assert!(view.warnings().is_empty());
    }

    #[test]
    fn test_sorted_non_decreasing_with_id_tiebreak() {
        let view = view(render_timeline(
            vec![
                update(5, Some("pending"), "in_progress", 10),
                update(3, Some("in_progress"), "resolved", 30),
                update(4, Some("pending"), "rejected", 10),
                update(1, Some("rejected"), "pending", 20),
            ],
            Locale::En,
        ));

        let entries: Vec<_> = view.entries().collect();
        assert!(entries.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        let ids: Vec<_> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![4, 5, 1, 3]);
    }

    #[test]
    fn test_entries_is_restartable() {
        let view = view(render_timeline(
            vec![update(1, Some("pending"), "in_progress", 1)],
            Locale::En,
        ));

        assert_eq!(view.entries().count(), 1);
        assert_eq!(view.entries().count(), 1);
        assert_eq!(view.entry_count(), 1);
    }

    #[test]
    fn test_unknown_status_maps_to_unknown_icon() {
        let view = view(render_timeline(
            vec![update(1, Some("pending"), "Escalated", 1)],
            Locale::Hi,
        ));

        let entry = view.entries().next().unwrap();
        assert_eq!(entry.icon_class, UNKNOWN_ICON);
        assert_eq!(entry.label, "Escalated");
    }

    #[test]
    fn test_icon_class_spellings() {
        assert_eq!(icon_class("In Progress"), "in-progress-icon");
        assert_eq!(icon_class("in-progress"), "in-progress-icon");
        assert_eq!(icon_class("PENDING"), "pending-icon");
        assert_eq!(icon_class("Rejected"), "rejected-icon");
        assert_eq!(icon_class(""), UNKNOWN_ICON);
    }

    #[test]
    fn test_warnings_for_broken_log() {
        let view = view(render_timeline(
            vec![
                update(1, Some("pending"), "resolved", 1),
                update(2, Some("in_progress"), "in_progress", 2),
                update(3, None, "pending", 3),
            ],
            Locale::En,
        ));

        let warnings = view.warnings();
        assert!(warnings.contains(&IntegrityWarning::ChainBreak {
            update_id: 2,
            expected: "resolved".to_string(),
            found: Some("in_progress".to_string()),
        }));
        assert!(warnings.contains(&IntegrityWarning::AfterTerminal {
            update_id: 2,
            terminal: "resolved".to_string(),
        }));
        assert!(warnings.contains(&IntegrityWarning::DisallowedTransition {
            update_id: 3,
            from: "in_progress".to_string(),
            to: "pending".to_string(),
        }));
        assert!(warnings.contains(&IntegrityWarning::ChainBreak {
            update_id: 3,
            expected: "in_progress".to_string(),
            found: None,
        }));
        // Rendering still yields every entry
        assert_eq!(view.entries().count(), 3);
    }

    #[test]
    fn test_legacy_spelling_keeps_chain_intact() {
        let view = view(render_timeline(
            vec![
                update(1, Some("Pending"), "In Progress", 1),
                update(2, Some("in progress"), "Resolved", 2),
            ],
            Locale::En,
        ));

        assert!(view.warnings().is_empty());
    }
}
