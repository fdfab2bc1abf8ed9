use axum::{Json, debug_handler, extract::{Path, Query, State}};
use oauth2::{CsrfToken, PkceCodeChallenge, Scope};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::{AppResult, session::{CSRF_STATE, PKCE_VERIFIER, RETURN_URL}};

use super::{Clients, clients::ClientProvider};

#[derive(Deserialize)]
pub(crate) struct LoginQuery {
    pub(crate) return_url: Option<String>,
}

/// Only same-site paths are remembered.
fn is_local_path(url: &str) -> bool {
    url.starts_with('/') && !url.starts_with("//") && !url.starts_with("/\\")
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn redirect_url(
    Path(provider): Path<ClientProvider>,
    Query(LoginQuery { return_url }): Query<LoginQuery>,
    State(clients): State<Clients>,
    session: Session,
) -> AppResult<Json<Value>> {
    let client = clients.get_client(provider)?;

    let (pkce_code_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

    let (authorize_url, csrf_state) = client.authorize_url(CsrfToken::new_random)
        .add_scopes(provider.scopes().iter().map(|scope| Scope::new(scope.to_string())))
        .set_pkce_challenge(pkce_code_challenge)
        .url();

    session.insert(CSRF_STATE, csrf_state.secret()).await?;
    session.insert(PKCE_VERIFIER, pkce_verifier.secret()).await?;
    if let Some(return_url) = return_url.filter(|url| is_local_path(url)) {
        session.insert(RETURN_URL, return_url).await?;
    }

    Ok(Json(json!({ "redirect_url": authorize_url.as_str() })))
}

#[cfg(test)]
mod tests {
    use super::is_local_path;

    #[test]
    fn return_urls_stay_on_site() {
        assert!(is_local_path("/matches"));
        assert!(!is_local_path("//evil.example"));
        assert!(!is_local_path("https://evil.example"));
        assert!(!is_local_path("/\\evil.example"));
    }
}
