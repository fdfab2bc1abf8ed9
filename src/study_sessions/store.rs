use sqlx::SqlitePool;

use crate::db::StudySession;

use super::NewSession;

pub async fn insert(db_pool: &SqlitePool, user_id: &str, session: &NewSession) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        r#"INSERT INTO study_sessions (user_id,partner_id,subject,duration_minutes,notes,completed_at)
        VALUES (?,?,?,?,?,strftime('%Y-%m-%dT%H:%M:%fZ', 'now')) RETURNING id"#,
    )
    .bind(user_id)
    .bind(session.partner_id.as_deref())
    .bind(&session.subject)
    .bind(session.duration_minutes)
    .bind(session.notes.as_deref().unwrap_or(""))
    .fetch_one(db_pool)
    .await?;

    Ok(id)
}

/// Newest first, with the partner's display name when they have a profile.
pub async fn list(db_pool: &SqlitePool, user_id: &str) -> Result<Vec<StudySession>, sqlx::Error> {
    sqlx::query_as(
        r#"SELECT s.*, p.name AS partner_name
        FROM study_sessions s
        LEFT JOIN user_profiles p ON s.partner_id = p.user_id
        WHERE s.user_id=?
        ORDER BY s.created_at DESC, s.id DESC"#,
    )
    .bind(user_id)
    .fetch_all(db_pool)
    .await
}
