mod clients;
mod lockin;
mod login;
mod logout;

use axum::{Json, Router, debug_handler, routing::get};
use serde_json::{Value, json};

use crate::{AppState, session::CurrentUser};

pub use clients::{ClientProvider, Clients};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/{provider}/redirect_url", get(login::redirect_url))
        .route("/auth/{provider}/callback", get(lockin::lockin))
        .route("/users/me", get(me))
        .route("/logout", get(logout::logout))
}

#[debug_handler]
async fn me(CurrentUser(user_id): CurrentUser) -> Json<Value> {
    Json(json!({ "id": user_id }))
}
