use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::repo_types::{Role, User};
use crate::auth::session::SessionClaims;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for change-password.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// Public part of the user returned after login. Never carries the hash.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub full_name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            role: u.role(),
            full_name: u.full_name.clone(),
            email: u.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: PublicUser,
}

/// Generic `{success, message}` envelope.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Identity echoed by check-auth: the session snapshot, not the live row.
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub full_name: String,
}

impl From<SessionClaims> for SessionUser {
    fn from(c: SessionClaims) -> Self {
        Self {
            id: c.user_id,
            username: c.username,
            role: c.role,
            full_name: c.full_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckAuthResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

/// Row in the admin-only user listing.
#[derive(Debug, Serialize)]
pub struct UserOverview {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub full_name: String,
    pub email: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login: Option<OffsetDateTime>,
}

impl From<&User> for UserOverview {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            role: u.role(),
            full_name: u.full_name.clone(),
            email: u.email.clone(),
            is_active: u.is_active,
            last_login: u.last_login,
        }
    }
}
