use axum::{Json, debug_handler, extract::State};
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::{AppResult, session::CurrentUser, validate::Valid};

use super::{NewMessage, store};

#[debug_handler(state = crate::AppState)]
pub async fn send_message(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
    Valid(NewMessage { receiver_id, message }): Valid<NewMessage>,
) -> AppResult<Json<Value>> {
    let id = store::insert(&db_pool, &user_id, &receiver_id, &message).await?;
    tracing::debug!(id, sender_id = %user_id, receiver_id = %receiver_id, "sent message");

    Ok(Json(json!({ "success": true })))
}
