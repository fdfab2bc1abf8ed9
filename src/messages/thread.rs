use axum::{Json, debug_handler, extract::{Path, State}};
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::{AppResult, db::ChatMessage, session::CurrentUser};

use super::store;

/// The whole history with `partner_id`, oldest first. Everything the partner
/// sent to the user is marked read on the way out.
pub async fn read_thread(db_pool: &SqlitePool, user_id: &str, partner_id: &str) -> Result<Vec<ChatMessage>, sqlx::Error> {
    let messages = store::thread(db_pool, user_id, partner_id).await?;
    let marked = store::mark_read_from(db_pool, user_id, partner_id).await?;
    tracing::debug!(user_id = %user_id, partner_id = %partner_id, marked, "read thread");

    Ok(messages)
}

#[debug_handler(state = crate::AppState)]
pub async fn get_thread(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
    Path(partner_id): Path<String>,
) -> AppResult<Json<Value>> {
    let messages = read_thread(&db_pool, &user_id, &partner_id).await?;
    Ok(Json(json!({ "messages": messages })))
}
