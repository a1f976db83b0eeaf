use serde::Serialize;
use serde_json::Value;

use crate::{AppResult, GetField};

/// The identity provider endpoints, derived from the configured API
/// key. Without a key the auth routes refuse with a clear notice and
/// the rest of the app keeps working.
#[derive(Clone)]
pub struct Clients {
    http: reqwest::Client,
    signup_url: Option<String>,
    signin_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

impl Clients {
    pub fn from_env() -> Clients {
        let key = dotenv::var("FIREBASE_API_KEY").ok();
        if key.is_none() {
            tracing::warn!("FIREBASE_API_KEY not supplied, sign-in is disabled");
        }
        let endpoint = |action: &str| {
            key.as_ref().map(|key| {
                format!("https://identitytoolkit.googleapis.com/v1/accounts:{action}?key={key}")
            })
        };
        Clients {
            http: reqwest::Client::new(),
            signup_url: endpoint("signUp"),
            signin_url: endpoint("signInWithPassword"),
        }
    }

    pub(crate) async fn sign_up(&self, email: &str, password: &str) -> AppResult<Value> {
        self.exchange(self.signup_url.as_deref(), email, password).await
    }

    pub(crate) async fn sign_in(&self, email: &str, password: &str) -> AppResult<Value> {
        self.exchange(self.signin_url.as_deref(), email, password).await
    }

    /// Posts the password grant and hands back the provider's verdict;
    /// rejections come back inside the body, not as an Err.
    async fn exchange(
        &self,
        url: Option<&str>,
        email: &str,
        password: &str,
    ) -> AppResult<Value> {
        let url = url.ok_or("identity provider keys not supplied")?;
        Ok(self
            .http
            .post(url)
            .json(&PasswordGrant {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await?
            .json()
            .await?)
    }
}

/// Pulls the provider's rejection out of a response body, if any.
pub(crate) fn provider_error(body: &Value) -> Option<String> {
    let err = body.get("error")?;
    Some(
        err.get_str_field("message")
            .unwrap_or_else(|_| "sign-in failed".to_owned()),
    )
}
