use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, RequestLocale};
use crate::features::auth::guards::RequireAuthority;
use crate::features::violations::dtos::{
    AppendStatusDto, AppendStatusResponseDto, AuthorityViolationDto, ViolationDetailDto,
};
use crate::features::violations::handlers::ViolationState;
use crate::shared::types::{ApiResponse, LimitQuery, Meta};

/// Most recent violations across all reporters
#[utoipa::path(
    get,
    path = "/api/authority/violations",
    params(
        LimitQuery,
        ("lang" = Option<String>, Query, description = "Display language: en, es or hi")
    ),
    responses(
        (status = 200, description = "Recent violations", body = ApiResponse<Vec<AuthorityViolationDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Authority access required")
    ),
    security(("bearer_auth" = [])),
    tag = "authority"
)]
pub async fn list_violations(
    RequireAuthority(_user): RequireAuthority,
    RequestLocale(locale): RequestLocale,
    State(state): State<ViolationState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<AuthorityViolationDto>>>> {
    let rows = state
        .violation_service
        .authority_list(query.clamped(), locale)
        .await?;
    let total = rows.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(rows),
        None,
        Some(Meta { total }),
    )))
}

/// Violation detail regardless of owner
#[utoipa::path(
    get,
    path = "/api/authority/violations/{id}",
    params(
        ("id" = Uuid, Path, description = "Violation ID"),
        ("lang" = Option<String>, Query, description = "Display language: en, es or hi")
    ),
    responses(
        (status = 200, description = "Violation found", body = ApiResponse<ViolationDetailDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Authority access required"),
        (status = 404, description = "Violation not found")
    ),
    security(("bearer_auth" = [])),
    tag = "authority"
)]
pub async fn get_violation(
    RequireAuthority(_user): RequireAuthority,
    RequestLocale(locale): RequestLocale,
    State(state): State<ViolationState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ViolationDetailDto>>> {
    let detail = state.violation_service.authority_detail(id, locale).await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// Append a status update to a violation's log
///
/// The violation's status and the log change together. Transitions outside
/// the normal lifecycle are recorded and come back with a `warning`.
#[utoipa::path(
    post,
    path = "/api/authority/violations/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Violation ID")
    ),
    request_body = AppendStatusDto,
    responses(
        (status = 200, description = "Status appended", body = ApiResponse<AppendStatusResponseDto>),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Authority access required"),
        (status = 404, description = "Violation not found")
    ),
    security(("bearer_auth" = [])),
    tag = "authority"
)]
pub async fn append_status(
    RequireAuthority(user): RequireAuthority,
    State(state): State<ViolationState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AppendStatusDto>,
) -> Result<Json<ApiResponse<AppendStatusResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let outcome = state
        .status_log_service
        .append_status(id, dto.status, dto.comment, &user)
        .await?;

    Ok(Json(ApiResponse::success(
        Some(outcome.into()),
        Some("Status updated".to_string()),
        None,
    )))
}
