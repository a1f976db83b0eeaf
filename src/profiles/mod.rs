pub mod model;
mod me;
mod page;

use axum::{Router, routing::get};

use crate::AppState;

pub use model::{Gender, LifestyleData, MIN_AGE, ProfileForm, RequestStatus, UserProfile};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me::me).post(me::complete))
        .route("/{uuid}", get(page::profile))
}
