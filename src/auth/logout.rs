use axum::response::IntoResponse;
use axum::{Json, debug_handler};
use serde_json::json;
use tower_sessions::Session;

use crate::AppResult;

#[debug_handler]
pub(crate) async fn logout(session: Session) -> AppResult<impl IntoResponse> {
    session.clear().await;
    Ok(Json(json!({ "authed": false })))
}
