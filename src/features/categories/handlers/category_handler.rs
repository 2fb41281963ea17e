use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::services::CategoryService;
use crate::shared::types::{ApiResponse, Meta};

/// List all violation categories, ordered by name
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = service.list();
    let total = categories.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(categories),
        None,
        Some(Meta { total }),
    )))
}

/// Get category by id
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = i32, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.get(id)?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::{CategoryRegistry, ViolationCategory};
    use crate::features::categories::routes;
    use axum_test::TestServer;

    fn server() -> TestServer {
        let registry = CategoryRegistry::from_categories([
            ViolationCategory { id: 4, name: "Speeding".to_string() },
            ViolationCategory { id: 1, name: "Signal Jumping".to_string() },
        ]);
        let service = Arc::new(CategoryService::new(Arc::new(registry)));
        TestServer::new(routes::routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_list_categories_sorted() {
        let body: serde_json::Value = server().get("/api/categories").await.json();

        assert_eq!(body["meta"]["total"], 2);
        assert_eq!(body["data"][0]["name"], "Signal Jumping");
        assert_eq!(body["data"][1]["id"], 4);
    }

    #[tokio::test]
    async fn test_get_unknown_category_is_not_found() {
        let response = server().get("/api/categories/42").expect_failure().await;
        response.assert_status_not_found();
    }
}
