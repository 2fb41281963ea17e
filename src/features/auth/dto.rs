use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::AuthenticatedUser;

/// DTO for /auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub account_id: String,
    pub sub: String,
    pub roles: Vec<String>,
    pub is_authority: bool,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        let is_authority = user.has_authority_access();
        Self {
            account_id: user.account_id,
            sub: user.sub,
            roles: user.roles,
            is_authority,
        }
    }
}
