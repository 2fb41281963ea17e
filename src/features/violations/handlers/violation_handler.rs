use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::RequestLocale;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::violations::dtos::{
    ReporterDashboardDto, SubmissionResponseDto, SubmitViolationForm, TimelineDto,
    ViolationDetailDto,
};
use crate::features::violations::services::{
    EvidenceFile, ReverseGeocoder, StatusLogService, SubmissionService, ViolationService,
};
use crate::shared::types::{ApiResponse, Meta};

/// Multipart part name carrying evidence files
const EVIDENCE_FIELD: &str = "evidence";

/// State for violation handlers
#[derive(Clone)]
pub struct ViolationState {
    pub submission_service: Arc<SubmissionService>,
    pub violation_service: Arc<ViolationService>,
    pub status_log_service: Arc<StatusLogService>,
    pub geocoder: Arc<dyn ReverseGeocoder>,
}

/// Report a traffic violation
///
/// Accepts multipart/form-data. Text fields may come in any order; repeat the
/// `evidence` part for each photo or video (at most five).
#[utoipa::path(
    post,
    path = "/api/violations",
    tag = "violations",
    request_body(
        content = SubmitViolationForm,
        content_type = "multipart/form-data",
        description = "Violation details with one or more evidence files",
    ),
    responses(
        (status = 201, description = "Violation reported", body = ApiResponse<SubmissionResponseDto>),
        (status = 400, description = "Missing or invalid fields; every problem in one message"),
        (status = 401, description = "Authentication required"),
        (status = 413, description = "Request too large"),
        (status = 502, description = "Evidence storage failed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn submit_violation(
    user: AuthenticatedUser,
    RequestLocale(locale): RequestLocale,
    State(state): State<ViolationState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionResponseDto>>)> {
    let mut draft = state.submission_service.new_draft();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == EVIDENCE_FIELD {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let file_name = field
                .file_name()
                .filter(|name| !name.is_empty())
                .map(|s| s.to_string());

            let data = field.bytes().await.map_err(|e| {
                debug!("Failed to read evidence bytes: {}", e);
                AppError::BadRequest(format!("Failed to read file data: {}", e))
            })?;

            // Browsers send an empty part with `filename=""` when no file was picked
            if data.is_empty() && file_name.is_none() {
                continue;
            }

            draft.attach(EvidenceFile {
                file_name: file_name.unwrap_or_else(|| "unnamed".to_string()),
                content_type,
                data: data.to_vec(),
            });
            continue;
        }

        let text = field.text().await.map_err(|e| {
            AppError::BadRequest(format!("Failed to read field '{}': {}", field_name, e))
        })?;
        if !draft.set_field(&field_name, text) {
            debug!("Ignoring unknown field: {}", field_name);
        }
    }

    let outcome = state.submission_service.submit(&user, draft).await?;
    let response = state
        .violation_service
        .describe_submission(outcome, locale);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(response),
            Some("Violation reported successfully".to_string()),
            None,
        )),
    ))
}

/// List the current reporter's violations with tab counts
#[utoipa::path(
    get,
    path = "/api/violations",
    params(
        ("lang" = Option<String>, Query, description = "Display language: en, es or hi")
    ),
    responses(
        (status = 200, description = "Reporter dashboard", body = ApiResponse<ReporterDashboardDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "violations"
)]
pub async fn list_my_violations(
    user: AuthenticatedUser,
    RequestLocale(locale): RequestLocale,
    State(state): State<ViolationState>,
) -> Result<Json<ApiResponse<ReporterDashboardDto>>> {
    let dashboard = state
        .violation_service
        .reporter_dashboard(&user, locale)
        .await?;
    let total = dashboard.counts.all as i64;
    Ok(Json(ApiResponse::success(
        Some(dashboard),
        None,
        Some(Meta { total }),
    )))
}

/// Get one of the current reporter's violations
#[utoipa::path(
    get,
    path = "/api/violations/{id}",
    params(
        ("id" = Uuid, Path, description = "Violation ID"),
        ("lang" = Option<String>, Query, description = "Display language: en, es or hi")
    ),
    responses(
        (status = 200, description = "Violation found", body = ApiResponse<ViolationDetailDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Violation not found")
    ),
    security(("bearer_auth" = [])),
    tag = "violations"
)]
pub async fn get_my_violation(
    user: AuthenticatedUser,
    RequestLocale(locale): RequestLocale,
    State(state): State<ViolationState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ViolationDetailDto>>> {
    let detail = state
        .violation_service
        .reporter_detail(&user, id, locale)
        .await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// Status timeline of one of the current reporter's violations
#[utoipa::path(
    get,
    path = "/api/violations/{id}/timeline",
    params(
        ("id" = Uuid, Path, description = "Violation ID"),
        ("lang" = Option<String>, Query, description = "Display language: en, es or hi")
    ),
    responses(
        (status = 200, description = "Rendered timeline", body = ApiResponse<TimelineDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Violation not found")
    ),
    security(("bearer_auth" = [])),
    tag = "violations"
)]
pub async fn get_my_timeline(
    user: AuthenticatedUser,
    RequestLocale(locale): RequestLocale,
    State(state): State<ViolationState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TimelineDto>>> {
    let timeline = state
        .violation_service
        .reporter_timeline(&user, id, locale)
        .await?;
    Ok(Json(ApiResponse::success(Some(timeline), None, None)))
}
