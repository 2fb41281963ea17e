use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{ROLE_AUTHORITY, ROLE_SUPER_ADMIN};

/// Session identity resolved from a validated access token.
///
/// Passed explicitly to every handler; `sub` is the stable reporter id
/// stored on violations.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub account_id: String,
    pub sub: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Check if user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(ROLE_SUPER_ADMIN)
    }

    /// Authorities (and super admins) review violations and append status updates
    pub fn has_authority_access(&self) -> bool {
        self.is_super_admin() || self.has_role(ROLE_AUTHORITY)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomClaims {
    #[serde(default)]
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            account_id: "acc".to_string(),
            sub: "sub".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_authority_access() {
        assert!(user_with(&["authority"]).has_authority_access());
        assert!(user_with(&["super_admin"]).has_authority_access());
        assert!(!user_with(&["citizen"]).has_authority_access());
        assert!(!user_with(&[]).has_authority_access());
    }
}
