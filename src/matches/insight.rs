//! The non-authoritative blurb generator. Whatever goes wrong here --
//! no key configured, transport trouble, an empty answer -- degrades to
//! a placeholder string; scoring and ranking never wait on it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, debug_handler};
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::profiles::UserProfile;
use crate::{AppResult, auth, db, res};

const MODEL: &str = "gemini-3-flash-preview";

#[derive(Clone)]
pub struct Insight {
    http: reqwest::Client,
    url: Option<String>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl Insight {
    pub fn from_env() -> Insight {
        let url = dotenv::var("GEMINI_API_KEY").ok().map(|key| {
            format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{MODEL}:generateContent?key={key}"
            )
        });
        if url.is_none() {
            tracing::warn!("GEMINI_API_KEY not supplied, insights will be placeholders");
        }
        Insight {
            http: reqwest::Client::new(),
            url,
        }
    }

    /// Two sentences on how `a` and `b` would get along, or a
    /// placeholder. Never fails.
    pub async fn blurb(&self, a: &UserProfile, b: &UserProfile) -> String {
        let Some(url) = &self.url else {
            return "AI insights unavailable.".to_owned();
        };

        let prompt = format!(
            "Analyze roommate compatibility:\n\
             {} (Gender: {}, Bio: {})\n\
             vs\n\
             {} (Gender: {}, Bio: {})\n\n\
             Provide 2 sentences on synergy or potential conflict.",
            a.name, a.gender, a.bio, b.name, b.gender, b.bio,
        );

        match self.generate(url, &prompt).await {
            Ok(Some(text)) => text,
            Ok(None) => "No insight available.".to_owned(),
            Err(err) => {
                tracing::warn!("insight request failed: {:#}", err.0);
                "Compatibility analysis skipped.".to_owned()
            }
        }
    }

    async fn generate(&self, url: &str, prompt: &str) -> AppResult<Option<String>> {
        let body: Value = self
            .http
            .post(url)
            .json(&GenerateRequest {
                contents: [Content {
                    parts: [Part { text: prompt }],
                }],
            })
            .send()
            .await?
            .json()
            .await?;

        let text = body
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.get(0))
            .and_then(|p| p.get("text"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned);
        Ok(text)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InsightBody {
    ai_insight: String,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn insight(
    Path(target): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    State(insight): State<Insight>,
    session: Session,
) -> AppResult<Response> {
    let Some(me) = auth::current_profile(&session, &db_pool).await? else {
        return res::sorry("match");
    };

    let Some(other) = db::load_profile(&db_pool, target).await? else {
        return Ok(res::notice(StatusCode::NOT_FOUND, "no such profile"));
    };

    let ai_insight = insight.blurb(&me, &other).await;
    Ok(Json(InsightBody { ai_insight }).into_response())
}
