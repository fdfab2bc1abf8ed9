use axum::{Json, debug_handler, extract::State};
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::{AppResult, session::CurrentUser, validate::Valid};

use super::{NewProfile, store};

#[debug_handler(state = crate::AppState)]
pub async fn save_profile(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
    Valid(profile): Valid<NewProfile>,
) -> AppResult<Json<Value>> {
    store::upsert(&db_pool, &user_id, &profile).await?;
    tracing::info!(user_id = %user_id, name = %profile.name, "saved profile");

    Ok(Json(json!({ "success": true })))
}
