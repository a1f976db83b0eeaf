use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, debug_handler};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{AppResult, auth, db, res};

use super::model::{ProfileForm, UserProfile};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn me(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let Some(profile) = auth::current_profile(&session, &db_pool).await? else {
        return res::sorry("profile");
    };
    Ok(Json(profile).into_response())
}

/// Saves the questionnaire. Validation happens before any persistence
/// call; a bad form never produces a partial save.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn complete(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(form): Json<ProfileForm>,
) -> AppResult<Response> {
    let Some(me) = auth::current_profile(&session, &db_pool).await? else {
        return res::sorry("profile");
    };

    let problems = form.problems();
    if !problems.is_empty() {
        return Ok(res::notice(StatusCode::BAD_REQUEST, &problems.join(", ")));
    }

    let avatar = if form.avatar.is_empty() {
        me.avatar
    } else {
        form.avatar
    };

    let profile = UserProfile {
        id: me.id,
        email: me.email,
        name: form.name,
        avatar,
        bio: form.bio,
        occupation: form.occupation,
        age: form.age,
        gender: form.gender,
        allow_opposite_gender: form.allow_opposite_gender,
        lifestyle: form.lifestyle.clamped(),
        sent_requests: me.sent_requests,
        accepted_requests: me.accepted_requests,
        rejected_requests: me.rejected_requests,
    };
    db::save_profile(&db_pool, &profile).await?;

    tracing::debug!("profile {} completed", profile.id);
    Ok(Json(profile).into_response())
}
