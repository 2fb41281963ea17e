use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::violations::dtos::{ReverseGeocodeDto, ReverseGeocodeQuery};
use crate::features::violations::handlers::ViolationState;
use crate::features::violations::services::coordinates_in_range;
use crate::features::violations::services::geocoding_service::lookup_place_name;
use crate::shared::types::ApiResponse;

/// Resolve coordinates to a place name for the report form
///
/// Lookup failures are not errors: `address` is `null` instead.
#[utoipa::path(
    get,
    path = "/api/geocode/reverse",
    params(ReverseGeocodeQuery),
    responses(
        (status = 200, description = "Place name, if any", body = ApiResponse<ReverseGeocodeDto>),
        (status = 400, description = "Coordinates out of range"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "geocoding"
)]
pub async fn reverse_geocode(
    _user: AuthenticatedUser,
    State(state): State<ViolationState>,
    Query(query): Query<ReverseGeocodeQuery>,
) -> Result<Json<ApiResponse<ReverseGeocodeDto>>> {
    let ReverseGeocodeQuery { lat, lng } = query;
    if !coordinates_in_range(lat, lng) {
        return Err(AppError::BadRequest(
            "Latitude must be within -90..90 and longitude within -180..180".to_string(),
        ));
    }

    let address = lookup_place_name(state.geocoder.as_ref(), lat, lng).await;

    Ok(Json(ApiResponse::success(
        Some(ReverseGeocodeDto { lat, lng, address }),
        None,
        None,
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::features::violations::handlers::test_support::{state_with_geocoder, StubGeocoder};
    use crate::features::violations::routes;
    use crate::shared::test_helpers::{create_reporter_user, with_auth};
    use axum_test::TestServer;

    fn server() -> TestServer {
        let ctx = state_with_geocoder(Arc::new(StubGeocoder));
        let app = with_auth(routes::routes(ctx.state), create_reporter_user());
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_reverse_geocode_found() {
        let body: serde_json::Value = server()
            .get("/api/geocode/reverse?lat=12.9352&lng=77.6245")
            .await
            .json();

        assert_eq!(body["data"]["address"], "Koramangala, Bengaluru");
        assert_eq!(body["data"]["lat"], 12.9352);
    }

    #[tokio::test]
    async fn test_reverse_geocode_failure_degrades_to_null() {
        let response = server().get("/api/geocode/reverse?lat=-33.86&lng=151.2").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert!(body["data"]["address"].is_null());
    }

    #[tokio::test]
    async fn test_reverse_geocode_out_of_range() {
        let response = server()
            .get("/api/geocode/reverse?lat=95&lng=10")
            .expect_failure()
            .await;

        response.assert_status_bad_request();
    }
}
