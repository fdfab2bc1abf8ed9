use std::sync::Arc;

use anyhow::Context;
use axum::{Router, http::{Method, header}};
use studymatch::{AppState, Config, api_router, auth, db, matches::OpenAiCompletion};
use tower_http::{cors::{Any, CorsLayer}, services::ServeDir, trace::TraceLayer};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::SameSite};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "studymatch=info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(config.session_inactivity_days)));

    let db_pool = db::connect(&config.database_url, config.database_max_connections)
        .await
        .context("couldn't open the database")?;
    db::migrate(&db_pool).await.context("couldn't migrate the database")?;

    let clients = auth::Clients::from_config(&config)?;
    let app_state = AppState {
        db_pool,
        clients,
        completion: Arc::new(OpenAiCompletion::from_config(&config)),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let mut app = Router::new()
        .nest("/api", api_router())
        .with_state(app_state);
    if let Some(static_dir) = &config.static_dir {
        app = app.fallback_service(ServeDir::new(static_dir));
    }
    let app = app
        .layer(session_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("couldn't bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
