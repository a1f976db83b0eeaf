use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::{Json, debug_handler};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::profiles::RequestStatus;
use crate::{AppResult, auth, db, res};

use super::derive;

#[debug_handler(state = crate::AppState)]
pub(crate) async fn incoming(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let Some(me) = auth::current_profile(&session, &db_pool).await? else {
        return res::sorry("inbox");
    };
    let others = db::load_all_others(&db_pool, me.id).await?;
    Ok(Json(derive::derive_incoming(&me, &others)).into_response())
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn outgoing(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let Some(me) = auth::current_profile(&session, &db_pool).await? else {
        return res::sorry("inbox");
    };
    let others = db::load_all_others(&db_pool, me.id).await?;
    Ok(Json(derive::derive_outgoing(&me, &others)).into_response())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusBody {
    request_status: Option<RequestStatus>,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn status(
    Path(target): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let Some(me) = auth::current_profile(&session, &db_pool).await? else {
        return res::sorry("status");
    };
    let others = db::load_all_others(&db_pool, me.id).await?;
    let request_status = derive::status_with(&me, &others, target);
    Ok(Json(StatusBody { request_status }).into_response())
}
