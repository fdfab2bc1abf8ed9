use std::str::FromStr;

use serde::Serialize;
use sqlx::{FromRow, SqlitePool, sqlite::{SqliteConnectOptions, SqlitePoolOptions}};

pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = if database_url.contains(":memory:") {
        // every connection to :memory: is its own database
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };

    pool_options.connect_with(options).await
}

pub async fn migrate(db_pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(db_pool).await
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Profile {
    pub id: i64,
    pub user_id: String,

    pub name: String,
    pub age: i64,
    pub grade: String,
    pub favorite_subjects: String,
    pub bio: String,

    pub is_active: bool,
    pub last_active_at: String,
    pub created_at: String,
    pub updated_at: String,

    // unique: user_id
}

/// Stored pairs are only read back by tests; responses carry `MatchWithProfile`.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct StudyMatch {
    pub id: i64,
    pub user_id: String,
    pub matched_user_id: String,

    pub compatibility_score: f64,
    pub match_reason: Option<String>,

    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,

    // unique: user_id, matched_user_id
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ChatMessage {
    pub id: i64,
    pub sender_id: String,
    pub receiver_id: String,

    pub message: String,
    pub is_read: bool,

    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct StudySession {
    pub id: i64,
    pub user_id: String,
    pub partner_id: Option<String>,

    pub subject: String,
    pub duration_minutes: Option<i64>,
    pub notes: Option<String>,

    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,

    /// Joined from the partner's profile; absent when there is no such profile.
    pub partner_name: Option<String>,
}
