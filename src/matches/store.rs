use sqlx::SqliteConnection;

/// Records the pair unless it is already there. Returns whether a row was added.
pub async fn insert_if_absent(
    conn: &mut SqliteConnection,
    user_id: &str,
    matched_user_id: &str,
    compatibility_score: f64,
    match_reason: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"INSERT INTO study_matches (user_id,matched_user_id,compatibility_score,match_reason) VALUES (?,?,?,?)
        ON CONFLICT(user_id,matched_user_id) DO NOTHING"#,
    )
    .bind(user_id)
    .bind(matched_user_id)
    .bind(compatibility_score)
    .bind(match_reason)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

#[cfg(test)]
pub(crate) async fn list(db_pool: &sqlx::SqlitePool, user_id: &str) -> Result<Vec<crate::db::StudyMatch>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM study_matches WHERE user_id=? ORDER BY id")
        .bind(user_id)
        .fetch_all(db_pool)
        .await
}
