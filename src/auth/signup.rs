use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, debug_handler};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::session::USER_ID;
use crate::{AppResult, GetField, db, res};

use super::Clients;
use super::clients::provider_error;
use super::login::Credentials;

#[debug_handler(state = crate::AppState)]
pub(crate) async fn signup(
    State(db_pool): State<SqlitePool>,
    State(clients): State<Clients>,
    session: Session,
    Json(Credentials { email, password }): Json<Credentials>,
) -> AppResult<Response> {
    let body = clients.sign_up(&email, &password).await?;
    if let Some(message) = provider_error(&body) {
        return Ok(res::notice(StatusCode::BAD_REQUEST, &message));
    }

    let user_id = body.get_str_field("localId")?;
    let profile = db::init_user_record(&db_pool, &user_id, &email).await?;
    session.insert(USER_ID, user_id.clone()).await?;

    tracing::info!("welcome u/{user_id}");
    Ok(Json(profile).into_response())
}
