// site-client/src/oauth.rs
// Google login callback: session cookie -> JWT pair -> user -> dashboard

use crate::auth::fetch_account;
use crate::client::ApiClient;
use crate::error::ClientError;
use crate::session::SessionWriter;
use chrono::Utc;
use common::models::{SessionUser, TokenPair};
use reqwest::Method;
use thiserror::Error;

pub const GOOGLE_JWT_PATH: &str = "/auth/google/jwt/";
pub const DASHBOARD_ROUTE: &str = "/dashboard";
pub const LOGIN_ERROR_ROUTE: &str = "/login?error=google";

/// Where the UI goes once the callback settles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Dashboard,
    LoginError,
}

impl Navigation {
    pub fn route(&self) -> &'static str {
        match self {
            Navigation::Dashboard => DASHBOARD_ROUTE,
            Navigation::LoginError => LOGIN_ERROR_ROUTE,
        }
    }
}

/// When the new token pair hits storage.
///
/// `Eager` wipes storage and writes the pair right after the exchange, so a
/// failed user lookup leaves the previous session destroyed. `Deferred`
/// writes nothing until the user lookup has succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitPolicy {
    #[default]
    Eager,
    Deferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackStage {
    ExchangeJwt,
    CommitTokens,
    FetchUser,
    PersistUser,
}

#[derive(Debug, Error)]
#[error("google callback failed at {stage:?}: {source}")]
pub struct CallbackFailure {
    pub stage: CallbackStage,
    #[source]
    pub source: ClientError,
}

fn at(stage: CallbackStage) -> impl FnOnce(ClientError) -> CallbackFailure {
    move |source| CallbackFailure { stage, source }
}

pub struct GoogleCallback<'a> {
    client: &'a ApiClient,
    writer: &'a SessionWriter,
    policy: CommitPolicy,
}

impl<'a> GoogleCallback<'a> {
    pub fn new(client: &'a ApiClient, writer: &'a SessionWriter) -> Self {
        Self {
            client,
            writer,
            policy: CommitPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CommitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run the pipeline. Every failure collapses into the same outcome.
    pub async fn run(&self) -> Navigation {
        match self.execute().await {
            Ok(user) => {
                tracing::info!("Google login completed for user {}", user.id);
                Navigation::Dashboard
            }
            Err(failure) => {
                tracing::warn!("{}", failure);
                Navigation::LoginError
            }
        }
    }

    /// Run the pipeline and report which stage failed
    pub async fn execute(&self) -> Result<SessionUser, CallbackFailure> {
        let tokens = self.exchange_jwt().await.map_err(at(CallbackStage::ExchangeJwt))?;

        if self.policy == CommitPolicy::Eager {
            self.commit_tokens(&tokens).map_err(at(CallbackStage::CommitTokens))?;
        }

        let account = fetch_account(self.client, &tokens.access)
            .await
            .map_err(at(CallbackStage::FetchUser))?;

        if self.policy == CommitPolicy::Deferred {
            self.commit_tokens(&tokens).map_err(at(CallbackStage::CommitTokens))?;
        }

        let user = SessionUser::from_account(&account, Utc::now());
        self.client
            .store()
            .save_user(&user)
            .map_err(at(CallbackStage::PersistUser))?;
        self.writer.set_user(Some(user.clone()));

        Ok(user)
    }

    /// Cookie-authenticated `GET /auth/google/jwt/`
    async fn exchange_jwt(&self) -> Result<TokenPair, ClientError> {
        let response = self.client.public(Method::GET, GOOGLE_JWT_PATH).send().await?;
        ApiClient::read_json(response).await
    }

    /// Wipe the namespace and store the new pair as one write
    fn commit_tokens(&self, tokens: &TokenPair) -> Result<(), ClientError> {
        self.client.store().reset_with_tokens(tokens)
    }
}
