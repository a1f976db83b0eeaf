use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::AppResult;

#[derive(Serialize)]
struct Notice<'a> {
    error: &'a str,
}

/// A dismissible error notice the frontend shows as-is.
pub fn notice(status: StatusCode, error: &str) -> Response {
    (status, Json(Notice { error })).into_response()
}

/// Standard refusal for routes that need a signed-in user.
pub fn sorry(what: &str) -> AppResult<Response> {
    Ok(notice(
        StatusCode::UNAUTHORIZED,
        &format!("sign in to see this {what}"),
    ))
}
