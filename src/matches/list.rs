use std::sync::Arc;

use axum::{Json, debug_handler, extract::State};
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::{AppResult, session::CurrentUser};

use super::{Completion, orchestrator};

#[debug_handler(state = crate::AppState)]
pub async fn get_matches(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
    State(completion): State<Arc<dyn Completion>>,
) -> AppResult<Json<Value>> {
    let matches = orchestrator::find_matches(&db_pool, completion.as_ref(), &user_id).await?;
    Ok(Json(json!({ "matches": matches })))
}
