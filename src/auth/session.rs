use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::auth::repo_types::{Role, User};

/// Identity snapshot taken at login time. The role is deliberately not
/// re-checked against the user row on later requests; a demoted user keeps
/// these claims until the session expires or they log in again.
#[derive(Debug, Clone, Serialize)]
pub struct SessionClaims {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
    pub full_name: String,
}

#[derive(Debug, Clone)]
struct Session {
    claims: SessionClaims,
    expires_at: OffsetDateTime,
}

/// In-memory session store keyed by an opaque token. Sessions have a fixed
/// absolute TTL from creation; validation never extends it.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Create a session for `user` and return the opaque token. Eviction is
    /// per client: the login handler destroys the token the request
    /// presented, so the same user may stay logged in on other devices.
    pub async fn create(&self, user: &User) -> String {
        let claims = SessionClaims {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role(),
            full_name: user.full_name.clone(),
        };
        let token = Uuid::new_v4().simple().to_string();
        let session = Session {
            claims,
            expires_at: OffsetDateTime::now_utc() + self.ttl,
        };

        let mut sessions = self.inner.write().await;
        sessions.insert(token.clone(), session);
        debug!(user_id = user.id, "session created");
        token
    }

    /// Resolve a token to its claims. Unknown and expired tokens yield
    /// `None`; expired entries are dropped on the way out.
    pub async fn validate(&self, token: &str) -> Option<SessionClaims> {
        let mut sessions = self.inner.write().await;
        match sessions.get(token) {
            Some(s) if s.expires_at > OffsetDateTime::now_utc() => Some(s.claims.clone()),
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }

    /// Idempotent: destroying an unknown token is a no-op.
    pub async fn destroy(&self, token: &str) {
        self.inner.write().await.remove(token);
    }
}
