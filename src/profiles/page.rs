use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, debug_handler};
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::session::USER_ID;
use crate::{AppResult, db, res};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn profile(
    Path(profile_id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    if session.get::<String>(USER_ID).await?.is_none() {
        return res::sorry("profile");
    }

    let Some(profile) = db::load_profile(&db_pool, profile_id).await? else {
        return Ok(res::notice(StatusCode::NOT_FOUND, "no such profile"));
    };

    Ok(Json(profile).into_response())
}
