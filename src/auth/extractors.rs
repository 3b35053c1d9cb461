use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::auth::repo_types::Role;
use crate::auth::session::SessionClaims;
use crate::error::ApiError;
use crate::state::AppState;

/// RequireAuth guard: resolves the session cookie to live claims.
pub struct CurrentUser(pub SessionClaims);

/// RequireAdmin guard: RequireAuth first, then the role check. A missing
/// session is therefore always a 401, never a 403.
pub struct AdminUser(pub SessionClaims);

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Please login first".into())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = match CookieJar::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };
        let token = jar
            .get(&state.config.session.cookie_name)
            .map(|c| c.value().to_string())
            .ok_or_else(unauthorized)?;
        let claims = state
            .sessions
            .validate(&token)
            .await
            .ok_or_else(unauthorized)?;
        Ok(CurrentUser(claims))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(claims) = CurrentUser::from_request_parts(parts, state).await?;
        if claims.role != Role::Admin {
            return Err(ApiError::Forbidden("Admin access required".into()));
        }
        Ok(AdminUser(claims))
    }
}
