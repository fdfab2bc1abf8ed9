use axum::{Json, debug_handler, extract::State};
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::{AppResult, session::CurrentUser};

use super::store;

#[debug_handler(state = crate::AppState)]
pub async fn get_profile(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Value>> {
    let profile = store::find(&db_pool, &user_id).await?;
    Ok(Json(json!({ "profile": profile })))
}
