use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::violations::{
    dtos as violations_dtos, handlers as violations_handlers, models as violations_models,
};
use crate::shared::locale::Locale;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // Categories (public)
        categories_handlers::list_categories,
        categories_handlers::get_category,
        // Violations (reporter)
        violations_handlers::submit_violation,
        violations_handlers::list_my_violations,
        violations_handlers::get_my_violation,
        violations_handlers::get_my_timeline,
        // Authority
        violations_handlers::list_violations,
        violations_handlers::get_violation,
        violations_handlers::append_status,
        // Geocoding
        violations_handlers::reverse_geocode,
    ),
    components(
        schemas(
            // Shared
            Meta,
            Locale,
            // Auth
            auth::dto::MeResponseDto,
            ApiResponse<auth::dto::MeResponseDto>,
            // Categories
            categories_dtos::CategoryResponseDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            // Violations
            violations_models::ViolationStatus,
            violations_models::MediaKind,
            violations_dtos::SubmitViolationForm,
            violations_dtos::EvidenceMediaDto,
            violations_dtos::StatusBadgeDto,
            violations_dtos::ViolationCardDto,
            violations_dtos::TabCountsDto,
            violations_dtos::ReporterDashboardDto,
            violations_dtos::ViolationDetailDto,
            violations_dtos::SubmissionResponseDto,
            violations_dtos::TimelineDto,
            violations_dtos::TimelineEntryDto,
            ApiResponse<violations_dtos::SubmissionResponseDto>,
            ApiResponse<violations_dtos::ReporterDashboardDto>,
            ApiResponse<violations_dtos::ViolationDetailDto>,
            ApiResponse<violations_dtos::TimelineDto>,
            // Authority
            violations_dtos::AuthorityViolationDto,
            violations_dtos::AppendStatusDto,
            violations_dtos::StatusUpdateDto,
            violations_dtos::AppendStatusResponseDto,
            ApiResponse<Vec<violations_dtos::AuthorityViolationDto>>,
            ApiResponse<violations_dtos::AppendStatusResponseDto>,
            // Geocoding
            violations_dtos::ReverseGeocodeDto,
            ApiResponse<violations_dtos::ReverseGeocodeDto>,
        )
    ),
    tags(
        (name = "auth", description = "Session identity"),
        (name = "categories", description = "Violation categories (public)"),
        (name = "violations", description = "Report violations and track their status"),
        (name = "authority", description = "Review violations and record status changes (authority only)"),
        (name = "geocoding", description = "Reverse geocoding for the report form"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Traffic Violation API",
        version = "0.1.0",
        description = "API documentation for traffic violation reporting",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_violation_routes() {
        let doc = ApiDoc::openapi();

        for path in [
            "/api/violations",
            "/api/violations/{id}/timeline",
            "/api/authority/violations/{id}/status",
            "/api/geocode/reverse",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }

        let schemes = doc.components.unwrap().security_schemes;
        assert!(schemes.contains_key("bearer_auth"));
    }
}
