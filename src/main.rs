use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router, debug_handler};
use roomiesync::{AppResult, AppState, auth, db, matches, profiles, requests, session};
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::cors::CorsLayer;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer, cookie::SameSite};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("roomiesync=debug,info")),
        )
        .init();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(30)));

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect(dotenv::var("DATABASE_URL")?.as_str())
        .await?;
    db::init(&db_pool).await.map_err(|e| e.0)?;

    let app_state = AppState {
        db_pool,
        clients: auth::Clients::from_env(),
        insight: matches::Insight::from_env(),
    };

    let app = Router::new()
        .route("/", get(hello))

        .merge(auth::router())
        .nest("/p", profiles::router())
        .nest("/m", matches::router())
        .nest("/r", requests::router())

        .with_state(app_state)
        .layer(session_layer)
        .layer(CorsLayer::permissive());

    let addr = "0.0.0.0:8080";
    tracing::info!("roomiesync listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[debug_handler]
async fn hello(session: Session) -> AppResult<impl IntoResponse> {
    let authed = session.get::<String>(session::USER_ID).await?.is_some();
    Ok(Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "authed": authed,
    })))
}
