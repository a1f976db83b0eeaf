use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, debug_handler};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::db::RequestSet;
use crate::profiles::RequestStatus;
use crate::{AppResult, auth, db, res};

#[derive(Deserialize)]
pub(crate) struct SendForm {
    to: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendBody {
    request_status: RequestStatus,
}

/// Asks `to` to room. Writes only the sender's own row (set-union, so
/// re-sending is a no-op); the recipient finds out when their incoming
/// view is next derived.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn send(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(SendForm { to }): Json<SendForm>,
) -> AppResult<Response> {
    let Some(me) = auth::current_profile(&session, &db_pool).await? else {
        return res::sorry("request");
    };

    if to == me.id {
        return Ok(res::notice(
            StatusCode::BAD_REQUEST,
            "you cannot room with yourself",
        ));
    }
    if db::load_profile(&db_pool, to).await?.is_none() {
        return Ok(res::notice(StatusCode::NOT_FOUND, "no such profile"));
    }

    db::append_to_set(&db_pool, me.id, RequestSet::Sent, to).await?;
    tracing::debug!("{} asked {to} to room", me.id);

    Ok(Json(SendBody {
        request_status: RequestStatus::Pending,
    })
    .into_response())
}
