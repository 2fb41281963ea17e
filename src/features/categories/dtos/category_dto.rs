use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::categories::models::ViolationCategory;

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: i32,
    pub name: String,
}

impl From<&ViolationCategory> for CategoryResponseDto {
    fn from(c: &ViolationCategory) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
        }
    }
}
