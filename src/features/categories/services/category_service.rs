use std::sync::Arc;

use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::models::{CategoryRegistry, ViolationCategory};

/// Read the category table into a registry. Called once at startup.
pub async fn load_registry(pool: &PgPool) -> Result<CategoryRegistry> {
    let categories = sqlx::query_as::<_, ViolationCategory>(
        r#"
        SELECT id, name
        FROM violation_categories
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to load violation categories: {:?}", e);
        AppError::Database(e)
    })?;

    Ok(CategoryRegistry::from_categories(categories))
}

/// Service for category operations
pub struct CategoryService {
    registry: Arc<CategoryRegistry>,
}

impl CategoryService {
    pub fn new(registry: Arc<CategoryRegistry>) -> Self {
        Self { registry }
    }

    pub fn list(&self) -> Vec<CategoryResponseDto> {
        self.registry.list().into_iter().map(Into::into).collect()
    }

    pub fn get(&self, id: i32) -> Result<CategoryResponseDto> {
        self.registry
            .get(id)
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }
}
