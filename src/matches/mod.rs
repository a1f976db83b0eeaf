pub mod rank;
pub mod score;
mod insight;
mod list;

use axum::{Router, routing::get};

use crate::AppState;

pub use insight::Insight;
pub use rank::{MatchResult, rank};
pub use score::{compatibility, is_gender_compatible};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::dashboard))
        .route("/{uuid}/insight", get(insight::insight))
}
