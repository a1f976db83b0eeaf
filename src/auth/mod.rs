mod clients;
mod login;
mod logout;
mod signup;

use axum::{
    Router,
    routing::{get, post},
};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::profiles::UserProfile;
use crate::session::USER_ID;
use crate::{AppResult, AppState, db};

pub use clients::Clients;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup::signup))
        .route("/login", post(login::login))
        .route("/logout", get(logout::logout))
}

/// The signed-in user's profile row, or `None` when nobody is home.
pub(crate) async fn current_profile(
    session: &Session,
    db_pool: &SqlitePool,
) -> AppResult<Option<UserProfile>> {
    let Some(user_id) = session.get::<String>(USER_ID).await? else {
        return Ok(None);
    };
    db::profile_by_user(db_pool, &user_id).await
}
