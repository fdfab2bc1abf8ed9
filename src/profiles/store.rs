use sqlx::SqlitePool;

use crate::db::Profile;

use super::NewProfile;

pub async fn find(db_pool: &SqlitePool, user_id: &str) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM user_profiles WHERE user_id=?")
        .bind(user_id)
        .fetch_optional(db_pool)
        .await
}

/// Every active profile except the given user's, in insertion order.
pub async fn active_except(db_pool: &SqlitePool, user_id: &str) -> Result<Vec<Profile>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM user_profiles WHERE user_id!=? AND is_active=1 ORDER BY id")
        .bind(user_id)
        .fetch_all(db_pool)
        .await
}

pub async fn upsert(db_pool: &SqlitePool, user_id: &str, profile: &NewProfile) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"INSERT INTO user_profiles (user_id,name,age,grade,favorite_subjects,bio) VALUES (?,?,?,?,?,?)
        ON CONFLICT(user_id) DO UPDATE SET
            name=excluded.name,
            age=excluded.age,
            grade=excluded.grade,
            favorite_subjects=excluded.favorite_subjects,
            bio=excluded.bio,
            updated_at=strftime('%Y-%m-%dT%H:%M:%fZ', 'now')"#,
    )
    .bind(user_id)
    .bind(&profile.name)
    .bind(profile.age)
    .bind(&profile.grade)
    .bind(&profile.favorite_subjects)
    .bind(profile.bio.as_deref().unwrap_or(""))
    .execute(db_pool)
    .await?;

    Ok(())
}
