use axum::{Json, debug_handler, extract::State};
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::{AppResult, session::CurrentUser, validate::Valid};

use super::{NewSession, store};

#[debug_handler(state = crate::AppState)]
pub async fn list_sessions(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Value>> {
    let sessions = store::list(&db_pool, &user_id).await?;
    Ok(Json(json!({ "sessions": sessions })))
}

// partner_id is not checked against existing profiles
#[debug_handler(state = crate::AppState)]
pub async fn add_session(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
    Valid(session): Valid<NewSession>,
) -> AppResult<Json<Value>> {
    let id = store::insert(&db_pool, &user_id, &session).await?;
    tracing::info!(id, user_id = %user_id, subject = %session.subject, "logged study session");

    Ok(Json(json!({ "success": true })))
}
