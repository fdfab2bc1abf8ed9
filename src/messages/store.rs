use sqlx::SqlitePool;

use crate::db::ChatMessage;

pub async fn insert(db_pool: &SqlitePool, sender_id: &str, receiver_id: &str, message: &str) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as("INSERT INTO chat_messages (sender_id,receiver_id,message) VALUES (?,?,?) RETURNING id")
        .bind(sender_id)
        .bind(receiver_id)
        .bind(message)
        .fetch_one(db_pool)
        .await?;

    Ok(id)
}

/// Everyone the user has sent to or received from, most recently active first.
pub async fn counterparties(db_pool: &SqlitePool, user_id: &str) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        r#"SELECT CASE WHEN sender_id=? THEN receiver_id ELSE sender_id END AS partner_id
        FROM chat_messages
        WHERE sender_id=? OR receiver_id=?
        GROUP BY partner_id
        ORDER BY MAX(created_at) DESC, MAX(id) DESC"#,
    )
    .bind(user_id)
    .bind(user_id)
    .bind(user_id)
    .fetch_all(db_pool)
    .await
}

pub async fn latest_between(db_pool: &SqlitePool, user_id: &str, partner_id: &str) -> Result<Option<ChatMessage>, sqlx::Error> {
    sqlx::query_as(
        r#"SELECT * FROM chat_messages
        WHERE (sender_id=? AND receiver_id=?) OR (sender_id=? AND receiver_id=?)
        ORDER BY created_at DESC, id DESC
        LIMIT 1"#,
    )
    .bind(user_id)
    .bind(partner_id)
    .bind(partner_id)
    .bind(user_id)
    .fetch_optional(db_pool)
    .await
}

pub async fn unread_from(db_pool: &SqlitePool, user_id: &str, partner_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM chat_messages WHERE sender_id=? AND receiver_id=? AND is_read=0")
        .bind(partner_id)
        .bind(user_id)
        .fetch_one(db_pool)
        .await
}

/// Oldest first.
pub async fn thread(db_pool: &SqlitePool, user_id: &str, partner_id: &str) -> Result<Vec<ChatMessage>, sqlx::Error> {
    sqlx::query_as(
        r#"SELECT * FROM chat_messages
        WHERE (sender_id=? AND receiver_id=?) OR (sender_id=? AND receiver_id=?)
        ORDER BY created_at ASC, id ASC"#,
    )
    .bind(user_id)
    .bind(partner_id)
    .bind(partner_id)
    .bind(user_id)
    .fetch_all(db_pool)
    .await
}

pub async fn mark_read_from(db_pool: &SqlitePool, user_id: &str, partner_id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"UPDATE chat_messages SET is_read=1, updated_at=strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE sender_id=? AND receiver_id=? AND is_read=0"#,
    )
    .bind(partner_id)
    .bind(user_id)
    .execute(db_pool)
    .await?;

    Ok(result.rows_affected())
}
