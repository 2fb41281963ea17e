//! Display locale passed explicitly into every render call.
//!
//! Handlers obtain it per request through `core::extractor::RequestLocale`;
//! nothing here is process-wide.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
    Hi,
}

impl Locale {
    /// Parse a language tag such as `es`, `es-MX` or `hi_IN`.
    /// Unsupported tags fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_', ';'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        match primary.as_str() {
            "es" => Locale::Es,
            "hi" => Locale::Hi,
            _ => Locale::En,
        }
    }

    /// Label for a canonical status key (`pending`, `in_progress`,
    /// `resolved`, `rejected`)
    pub fn status_label(self, key: &str) -> Option<&'static str> {
        let label = match (self, key) {
            (Locale::En, "pending") => "Pending",
            (Locale::En, "in_progress") => "In Progress",
            (Locale::En, "resolved") => "Resolved",
            (Locale::En, "rejected") => "Rejected",
            (Locale::Es, "pending") => "Pendiente",
            (Locale::Es, "in_progress") => "En progreso",
            (Locale::Es, "resolved") => "Resuelto",
            (Locale::Es, "rejected") => "Rechazado",
            (Locale::Hi, "pending") => "लंबित",
            (Locale::Hi, "in_progress") => "प्रगति पर",
            (Locale::Hi, "resolved") => "हल किया गया",
            (Locale::Hi, "rejected") => "अस्वीकृत",
            _ => return None,
        };
        Some(label)
    }

    /// Shown instead of a timeline when a violation has no status updates
    pub fn no_status_updates(self) -> &'static str {
        match self {
            Locale::En => "No status updates yet. Your report is being reviewed.",
            Locale::Es => "Aún no hay actualizaciones de estado. Su reporte está siendo revisado.",
            Locale::Hi => "अभी तक कोई स्थिति अपडेट नहीं। आपकी रिपोर्ट की समीक्षा की जा रही है।",
        }
    }

    pub fn unknown_category(self) -> &'static str {
        match self {
            Locale::En => "Unknown",
            Locale::Es => "Desconocido",
            Locale::Hi => "अज्ञात",
        }
    }

    pub fn location_not_specified(self) -> &'static str {
        match self {
            Locale::En => "Location not specified",
            Locale::Es => "Ubicación no especificada",
            Locale::Hi => "स्थान निर्दिष्ट नहीं",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(Locale::from_tag("es"), Locale::Es);
        assert_eq!(Locale::from_tag("es-MX"), Locale::Es);
        assert_eq!(Locale::from_tag("HI_in"), Locale::Hi);
        assert_eq!(Locale::from_tag("fr"), Locale::En);
        assert_eq!(Locale::from_tag(""), Locale::En);
    }

    #[test]
    fn test_status_label_unknown_key() {
        assert_eq!(Locale::Es.status_label("in_progress"), Some("En progreso"));
        assert_eq!(Locale::En.status_label("archived"), None);
    }
}
