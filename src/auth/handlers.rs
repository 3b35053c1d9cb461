use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            ChangePasswordRequest, CheckAuthResponse, LoginRequest, LoginResponse,
            MessageResponse, PublicUser, UserOverview,
        },
        extractors::{AdminUser, CurrentUser},
        password::{hash_password, verify_password},
        repo_types::User,
    },
    config::SessionConfig,
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/check-auth", get(check_auth))
        .route("/change-password", post(change_password))
        .route("/users", get(list_users))
}

fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(config.cookie_name.clone(), token);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(config.cookie_secure);
    cookie.set_path("/");
    cookie.set_max_age(Duration::hours(config.ttl_hours));
    cookie
}

fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), ""))
        .path("/")
        .build()
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let username = payload.username.trim();
    if username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".into(),
        ));
    }

    let user = User::find_by_username(&state.db, username)
        .await
        .map_err(|e| ApiError::internal("An error occurred during login", e))?
        .ok_or_else(|| {
            warn!(username, "login with unknown username");
            // Same message as a wrong password, to avoid user enumeration.
            ApiError::Unauthorized("Invalid username or password".into())
        })?;

    if !user.is_active {
        warn!(user_id = user.id, "login on deactivated account");
        return Err(ApiError::Forbidden(
            "Account is deactivated. Please contact administrator.".into(),
        ));
    }

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = user.id, "login with invalid password");
        return Err(ApiError::Unauthorized(
            "Invalid username or password".into(),
        ));
    }

    User::touch_last_login(&state.db, user.id)
        .await
        .map_err(|e| ApiError::internal("An error occurred during login", e))?;

    // Clear-before-set for this client only; sessions on other devices
    // stay live.
    if let Some(cookie) = jar.get(&state.config.session.cookie_name) {
        state.sessions.destroy(cookie.value()).await;
    }
    let token = state.sessions.create(&user).await;
    let jar = jar.add(session_cookie(&state.config.session, token));

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            message: "Login successful".into(),
            user: PublicUser::from(&user),
        }),
    ))
}

/// Always succeeds, even without a session.
#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    if let Some(cookie) = jar.get(&state.config.session.cookie_name) {
        state.sessions.destroy(cookie.value()).await;
    }
    let jar = jar.remove(removal_cookie(&state.config.session));
    (jar, Json(MessageResponse::ok("Logged out successfully")))
}

/// Never fails; reports whether a live session accompanies the request.
#[instrument(skip(state, jar))]
pub async fn check_auth(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Json<CheckAuthResponse> {
    let claims = match jar.get(&state.config.session.cookie_name) {
        Some(cookie) => state.sessions.validate(cookie.value()).await,
        None => None,
    };
    Json(CheckAuthResponse {
        authenticated: claims.is_some(),
        user: claims.map(Into::into),
    })
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if payload.current_password.is_empty() || payload.new_password.is_empty() {
        return Err(ApiError::BadRequest(
            "Current and new password are required".into(),
        ));
    }
    // Character count, not byte length: multibyte passwords must not slip
    // under the minimum.
    if payload.new_password.chars().count() < 8 {
        return Err(ApiError::BadRequest(
            "Password must be at least 8 characters long".into(),
        ));
    }

    let user = User::find_by_id(&state.db, claims.user_id)
        .await
        .map_err(|e| ApiError::internal("An error occurred while changing password", e))?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    if !verify_password(&payload.current_password, &user.password_hash) {
        warn!(user_id = user.id, "change-password with wrong current password");
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".into(),
        ));
    }

    let new_hash = hash_password(&payload.new_password)
        .map_err(|e| ApiError::internal("An error occurred while changing password", e))?;
    User::update_password(&state.db, user.id, &new_hash)
        .await
        .map_err(|e| ApiError::internal("An error occurred while changing password", e))?;

    info!(user_id = user.id, "password changed");
    Ok(Json(MessageResponse::ok("Password changed successfully")))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
) -> Result<Json<Vec<UserOverview>>, ApiError> {
    let users = User::list_all(&state.db)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch users", e))?;
    Ok(Json(users.iter().map(UserOverview::from).collect()))
}
