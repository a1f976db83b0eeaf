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

/// The two ways to answer a request. Resolving again with the other
/// decision moves the id across; rejection is not terminal.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Decision {
    Accepted,
    Rejected,
}

#[derive(Deserialize)]
pub(crate) struct ResolveForm {
    other: Uuid,
    decision: Decision,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolveBody {
    request_status: RequestStatus,
}

/// Files `other` under the chosen outcome set on the decider's own row
/// and pulls it from the opposite one, keeping the two exclusive.
///
/// Deliberately does not check that `other` ever sent a request: the
/// decider only writes its own row, and the deriver ignores an
/// acceptance nobody asked for when building incoming views, so the
/// permissiveness costs nothing.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn resolve(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(ResolveForm { other, decision }): Json<ResolveForm>,
) -> AppResult<Response> {
    let Some(me) = auth::current_profile(&session, &db_pool).await? else {
        return res::sorry("request");
    };

    if other == me.id {
        return Ok(res::notice(
            StatusCode::BAD_REQUEST,
            "you cannot answer yourself",
        ));
    }

    let (target, opposite, status) = match decision {
        Decision::Accepted => (RequestSet::Accepted, RequestSet::Rejected, RequestStatus::Accepted),
        Decision::Rejected => (RequestSet::Rejected, RequestSet::Accepted, RequestStatus::Rejected),
    };

    db::append_to_set(&db_pool, me.id, target, other).await?;
    db::remove_from_set(&db_pool, me.id, opposite, other).await?;
    tracing::debug!("{} answered {other}: {status:?}", me.id);

    Ok(Json(ResolveBody {
        request_status: status,
    })
    .into_response())
}
