// site-client/src/auth.rs
use crate::client::ApiClient;
use crate::error::Result;
use crate::oauth::{CommitPolicy, GoogleCallback};
use crate::session::{SessionContext, SessionWriter};
use chrono::Utc;
use common::models::{Account, SessionUser, TokenPair};
use reqwest::Method;
use serde::{Deserialize, Serialize};

pub const USER_PATH: &str = "/api/user/";
pub const TOKEN_REFRESH_PATH: &str = "/api/token/refresh/";
pub const EMAIL_LOGIN_PATH: &str = "/api/token/email/";

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    access: Option<String>,
}

#[derive(Serialize)]
struct EmailLogin<'a> {
    email: &'a str,
    password: &'a str,
}

/// Login responses may omit the refresh token
#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    access: Option<String>,
    #[serde(default)]
    refresh: Option<String>,
}

/// Exchange the stored refresh token for a new access token.
///
/// Returns `None` without touching the network when no refresh token is
/// stored, and `None` on any failure. Existing tokens are left in place
/// either way; callers decide what to do next.
pub async fn refresh_access_token(client: &ApiClient) -> Option<String> {
    let refresh = client.store().refresh_token()?;

    let response = client
        .public(Method::POST, TOKEN_REFRESH_PATH)
        .json(&RefreshRequest { refresh: &refresh })
        .send()
        .await
        .map_err(|e| tracing::warn!("Token refresh request failed: {}", e))
        .ok()?;

    let body: RefreshResponse = response
        .json()
        .await
        .map_err(|e| tracing::warn!("Token refresh returned an unreadable body: {}", e))
        .ok()?;

    let access = body.access.filter(|a| !a.is_empty())?;
    if let Err(e) = client.store().save_access_token(&access) {
        tracing::error!("Refreshed access token could not be persisted: {}", e);
        return None;
    }

    tracing::debug!("Access token refreshed");
    Some(access)
}

/// `GET /api/user/` with an explicit access token
pub async fn fetch_account(client: &ApiClient, access: &str) -> Result<Account> {
    let response = client.with_token(Method::GET, USER_PATH, access).send().await?;
    ApiClient::read_json(response).await
}

/// Owner of the session writer; every user change goes through here
#[derive(Debug)]
pub struct Authenticator {
    client: ApiClient,
    writer: SessionWriter,
}

impl Authenticator {
    pub fn new(client: ApiClient, writer: SessionWriter) -> Self {
        Self { client, writer }
    }

    /// Build an authenticator with a context restored from storage
    pub fn restore(client: ApiClient) -> (Self, SessionContext) {
        let (writer, ctx) = SessionContext::restore(client.store());
        (Self::new(client, writer), ctx)
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn context(&self) -> SessionContext {
        self.writer.context()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.writer.current()
    }

    /// Email/password login.
    ///
    /// `Ok(false)` when the server rejects the credentials or the user lookup
    /// fails; transport and storage errors propagate.
    pub async fn login(&self, email: &str, password: &str) -> Result<bool> {
        let response = self
            .client
            .public(Method::POST, EMAIL_LOGIN_PATH)
            .json(&EmailLogin { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::info!("Login rejected for {}: {}", email, response.status());
            return Ok(false);
        }

        let body: LoginResponse = response.json().await?;
        let access = match body.access.filter(|a| !a.is_empty()) {
            Some(access) => access,
            None => {
                tracing::warn!("Login response for {} carried no access token", email);
                return Ok(false);
            }
        };

        let account = match fetch_account(&self.client, &access).await {
            Ok(account) => account,
            Err(e) => {
                tracing::warn!("User lookup after login failed: {}", e);
                return Ok(false);
            }
        };

        let user = SessionUser::from_account(&account, Utc::now());
        let tokens = TokenPair {
            access,
            // Blank refresh tokens are dropped, not stored
            refresh: body.refresh.unwrap_or_default(),
        };
        self.client.store().save_session(&tokens, &user)?;
        self.writer.set_user(Some(user));
        Ok(true)
    }

    /// Startup hydration.
    ///
    /// With a stored access token the user is re-fetched; a failed lookup
    /// signs the session out. Without one, the persisted user mirror is used.
    pub async fn hydrate(&self) -> Result<Option<SessionUser>> {
        let store = self.client.store();

        let access = match store.access_token() {
            Some(access) => access,
            None => {
                let user = store.load_user();
                self.writer.set_user(user.clone());
                return Ok(user);
            }
        };

        match fetch_account(&self.client, &access).await {
            Ok(account) => {
                let user = SessionUser::from_account(&account, Utc::now());
                store.save_user(&user)?;
                self.writer.set_user(Some(user.clone()));
                Ok(Some(user))
            }
            Err(e) => {
                tracing::warn!("Stored access token rejected, signing out: {}", e);
                self.writer.set_user(None);
                store.clear_session()?;
                Ok(None)
            }
        }
    }

    /// Drop the user and the persisted session together
    pub fn logout(&self) -> Result<()> {
        self.writer.set_user(None);
        self.client.store().clear_session()
    }

    /// The Google OAuth callback pipeline with the default commit policy
    pub fn google_callback(&self) -> GoogleCallback<'_> {
        GoogleCallback::new(&self.client, &self.writer)
    }

    pub fn google_callback_with(&self, policy: CommitPolicy) -> GoogleCallback<'_> {
        GoogleCallback::new(&self.client, &self.writer).with_policy(policy)
    }
}
