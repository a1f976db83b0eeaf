pub mod appresult;
pub mod auth;
pub mod db;
pub mod matches;
pub mod profiles;
pub mod requests;
pub mod res;
pub mod session;

use axum::extract::FromRef;
use sqlx::SqlitePool;

pub use appresult::{AppError, AppResult};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub clients: auth::Clients,
    pub insight: matches::Insight,
}

pub trait GetField {
    fn get_str_field(&self, field: &str) -> AppResult<String>;
}

impl GetField for serde_json::Value {
    fn get_str_field(&self, field: &str) -> AppResult<String> {
        Ok(
            self.get(field)
            .ok_or(format!("expected {field} in response"))?
            .as_str()
            .ok_or(format!("expected {field} in response to be string"))?
            .to_owned()
        )
    }
}
