use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, debug_handler};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::session::USER_ID;
use crate::{AppResult, GetField, db, res};

use super::Clients;
use super::clients::provider_error;

#[derive(Deserialize)]
pub(crate) struct Credentials {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    State(clients): State<Clients>,
    session: Session,
    Json(Credentials { email, password }): Json<Credentials>,
) -> AppResult<Response> {
    let body = clients.sign_in(&email, &password).await?;
    if let Some(message) = provider_error(&body) {
        return Ok(res::notice(StatusCode::UNAUTHORIZED, &message));
    }

    let user_id = body.get_str_field("localId")?;
    // the row may predate this device, or this may be the first visit
    let profile = db::init_user_record(&db_pool, &user_id, &email).await?;
    session.insert(USER_ID, user_id.clone()).await?;

    tracing::info!("welcome back u/{user_id}");
    Ok(Json(profile).into_response())
}
