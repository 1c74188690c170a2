// site-client/src/client.rs
use crate::error::{ClientError, Result};
use crate::session_store::SessionStore;
use common::{join_url, normalize_base_url, Config};
use reqwest::cookie::Jar;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    cookies: Arc<Jar>,
    store: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: &str, store: SessionStore) -> Result<Self> {
        let base_url = normalize_base_url(base_url);
        Url::parse(&base_url)
            .map_err(|e| ClientError::Invalid(format!("bad API base URL {}: {}", base_url, e)))?;

        let cookies = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(cookies.clone())
            .build()?;

        tracing::debug!("API client targeting {}", base_url);

        Ok(Self {
            http,
            base_url,
            cookies,
            store,
        })
    }

    pub fn from_config(config: &Config, store: SessionStore) -> Result<Self> {
        Self::new(&config.api_base_url, store)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Seed the backend session cookie so cookie-authenticated endpoints
    /// (the Google JWT exchange) receive it.
    pub fn with_session_cookie(&self, name: &str, value: &str) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Invalid(e.to_string()))?;
        self.cookies
            .add_cookie_str(&format!("{}={}; Path=/", name, value), &url);
        Ok(())
    }

    /// Request that never carries a bearer token
    pub fn public(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// Request carrying the stored access token, if any
    pub fn authorized(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.public(method, path);
        match self.store.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Request carrying an explicit token rather than the stored one
    pub fn with_token(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.public(method, path).bearer_auth(token)
    }

    /// Stored access token, or [`ClientError::MissingToken`] before any I/O
    pub fn require_token(&self) -> Result<String> {
        self.store.access_token().ok_or(ClientError::MissingToken)
    }

    /// Absolute request for a URL the server handed back (file downloads).
    ///
    /// The access token is attached only when the target shares the API
    /// origin; media served from elsewhere never sees it.
    pub fn absolute(&self, method: Method, url: &str) -> RequestBuilder {
        let target = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            self.url(url)
        };
        let same_origin = self.is_api_origin(&target);
        let request = self.http.request(method, target);
        match self.store.access_token() {
            Some(token) if same_origin => request.bearer_auth(token),
            _ => request,
        }
    }

    fn is_api_origin(&self, target: &str) -> bool {
        match (Url::parse(&self.base_url), Url::parse(target)) {
            (Ok(base), Ok(target)) => base.origin() == target.origin(),
            _ => false,
        }
    }

    pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn read_empty(response: Response) -> Result<()> {
        Self::check(response).await.map(|_| ())
    }

    /// Pass 2xx through, convert anything else into an HTTP error
    pub async fn check(response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

        tracing::debug!("Request failed with {}: {}", status, detail);

        Err(ClientError::Http { status, detail })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("store", &self.store)
            .finish()
    }
}

/// Best-effort human readable detail from an error body
fn error_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            for key in ["detail", "error", "message"] {
                if let Some(Value::String(text)) = map.get(key) {
                    return Some(text.clone());
                }
            }
            Some(Value::Object(map).to_string())
        }
        Ok(Value::String(text)) => Some(text),
        Ok(other) => Some(other.to_string()),
        Err(_) => Some(body.to_string()),
    }
}
