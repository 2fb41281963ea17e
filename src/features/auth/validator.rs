use super::model::{AuthenticatedUser, CustomClaims};
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::jwks::JwksClient;

pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    claims_namespace: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    // iss/aud/exp/nbf are checked by jsonwebtoken itself
    sub: String,

    #[serde(default)]
    kind: Option<String>,
    #[serde(rename = "accountId", default)]
    account_id: Option<String>,

    // Namespaced custom claims live under a provider-configured key
    #[serde(flatten)]
    extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    fn roles(&self, namespace: &str) -> Vec<String> {
        self.extra
            .get(namespace)
            .and_then(|value| serde_json::from_value::<CustomClaims>(value.clone()).ok())
            .map(|custom| custom.roles)
            .unwrap_or_default()
    }
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        claims_namespace: String,
        leeway: Duration,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            claims_namespace,
            leeway: leeway.as_secs(),
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only RS256 is allowed",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;

        let decoding_key = self
            .jwks_client
            .get_key(&kid)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let claims = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?
            .claims;

        user_from_claims(claims, &self.claims_namespace)
    }
}

fn user_from_claims(claims: Claims, namespace: &str) -> Result<AuthenticatedUser, AppError> {
    if let Some(kind) = &claims.kind {
        if kind != "AccessToken" {
            return Err(AppError::Auth("Token is not an access token".to_string()));
        }
    }

    let roles = claims.roles(namespace);
    let account_id = claims.account_id.unwrap_or_else(|| claims.sub.clone());

    Ok(AuthenticatedUser {
        account_id,
        sub: claims.sub,
        roles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NS: &str = "https://traffic-reporter/claims";

    fn claims(value: serde_json::Value) -> Claims {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_roles_read_from_namespace() {
        let user = user_from_claims(
            claims(json!({
                "sub": "user-1",
                "accountId": "acc-1",
                NS: { "roles": ["authority"] }
            })),
            NS,
        )
        .unwrap();

        assert_eq!(user.account_id, "acc-1");
        assert_eq!(user.roles, vec!["authority".to_string()]);
    }

    #[test]
    fn test_missing_namespace_yields_no_roles() {
        let user = user_from_claims(
            claims(json!({ "sub": "user-2", "other/claims": { "roles": ["super_admin"] } })),
            NS,
        )
        .unwrap();

        assert_eq!(user.account_id, "user-2");
        assert!(user.roles.is_empty());
    }

    #[test]
    fn test_non_access_token_rejected() {
        let result = user_from_claims(claims(json!({ "sub": "u", "kind": "IdToken" })), NS);
        assert!(matches!(result, Err(AppError::Auth(_))));
    }
}
