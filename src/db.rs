use sqlx::PgPool;
use tracing::info;

use crate::auth::password::hash_password;
use crate::auth::repo_types::User;

/// Default accounts provisioned on first run, when the users table is empty.
/// (username, password, role, full name, email)
const DEFAULT_USERS: [(&str, &str, &str, &str, &str); 6] = [
    ("admin1", "Admin@123", "admin", "Admin One", "admin1@dashboard.com"),
    ("admin2", "Admin@456", "admin", "Admin Two", "admin2@dashboard.com"),
    ("user1", "User@123", "user", "User One", "user1@dashboard.com"),
    ("user2", "User@456", "user", "User Two", "user2@dashboard.com"),
    ("user3", "User@789", "user", "User Three", "user3@dashboard.com"),
    ("user4", "User@012", "user", "User Four", "user4@dashboard.com"),
];

pub async fn seed_default_users(db: &PgPool) -> anyhow::Result<()> {
    let count = User::count(db).await?;
    if count > 0 {
        info!(count, "users already exist, skipping seed");
        return Ok(());
    }

    for (username, password, role, full_name, email) in DEFAULT_USERS {
        let hash = hash_password(password)?;
        User::create(db, username, &hash, role, full_name, email).await?;
    }
    info!(count = DEFAULT_USERS.len(), "default users created");
    Ok(())
}
