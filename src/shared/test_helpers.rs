#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Router,
};

#[cfg(test)]
pub fn create_reporter_user() -> AuthenticatedUser {
    AuthenticatedUser {
        account_id: "reporter-account-id".to_string(),
        sub: "reporter-sub".to_string(),
        roles: vec!["citizen".to_string()],
    }
}

#[cfg(test)]
pub fn create_authority_user() -> AuthenticatedUser {
    AuthenticatedUser {
        account_id: "authority-account-id".to_string(),
        sub: "authority-sub".to_string(),
        roles: vec!["authority".to_string()],
    }
}

#[cfg(test)]
async fn inject_user_middleware(
    State(user): State<AuthenticatedUser>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Wrap a router so every request carries `user` as its session
#[cfg(test)]
pub fn with_auth(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn_with_state(
        user,
        inject_user_middleware,
    ))
}
