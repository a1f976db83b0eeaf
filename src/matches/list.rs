use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Json, debug_handler};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::profiles::RequestStatus;
use crate::requests::derive::{self, IncomingRequest, OutgoingRequest};
use crate::{AppResult, auth, db, res};

use super::rank::{self, MatchResult};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MatchCard {
    #[serde(flatten)]
    result: MatchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_status: Option<RequestStatus>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Dashboard {
    matches: Vec<MatchCard>,
    incoming: Vec<IncomingRequest>,
    outgoing: Vec<OutgoingRequest>,
}

/// The one explicit recompute of every derived view: load the world,
/// rank it, derive both request lists, annotate each card. Called by
/// the frontend after every successful mutation or refresh; nothing is
/// cached in between.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn dashboard(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let Some(me) = auth::current_profile(&session, &db_pool).await? else {
        return res::sorry("dashboard");
    };

    let others = db::load_all_others(&db_pool, me.id).await?;

    let matches = rank::rank(&me, &others)
        .into_iter()
        .map(|result| {
            let request_status = derive::status_with(&me, &others, result.profile.id);
            MatchCard {
                result,
                request_status,
            }
        })
        .collect();

    let incoming = derive::derive_incoming(&me, &others);
    let outgoing = derive::derive_outgoing(&me, &others);

    Ok(Json(Dashboard {
        matches,
        incoming,
        outgoing,
    })
    .into_response())
}
