pub mod derive;
mod resolve;
mod send;
mod views;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/incoming", get(views::incoming))
        .route("/outgoing", get(views::outgoing))
        .route("/status/{uuid}", get(views::status))
        .route("/send", post(send::send))
        .route("/resolve", post(resolve::resolve))
}
