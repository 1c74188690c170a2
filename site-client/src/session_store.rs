// site-client/src/session_store.rs
use crate::error::Result;
use crate::storage::{Change, Storage};
use common::models::{SessionUser, SiteContent, TokenPair};

pub const ACCESS_KEY: &str = "access";
pub const REFRESH_KEY: &str = "refresh";
pub const USER_KEY: &str = "user";
pub const SITE_CONTENT_KEY: &str = "siteContent";

#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    storage: Storage,
}

impl SessionStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Storage::memory())
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn access_token(&self) -> Option<String> {
        self.storage.get(ACCESS_KEY).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.storage.get(REFRESH_KEY).filter(|t| !t.is_empty())
    }

    pub fn load_tokens(&self) -> Option<TokenPair> {
        Some(TokenPair {
            access: self.access_token()?,
            refresh: self.refresh_token()?,
        })
    }

    /// Write the pair in one step. An empty refresh token removes the key
    /// rather than storing a blank value.
    pub fn save_tokens(&self, tokens: &TokenPair) -> Result<()> {
        self.storage.write_batch(&token_changes(tokens))
    }

    pub fn save_access_token(&self, access: &str) -> Result<()> {
        self.storage.set(ACCESS_KEY, access)
    }

    /// Persisted user mirror; an unreadable record is treated as absent
    pub fn load_user(&self) -> Option<SessionUser> {
        let raw = self.storage.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Ignoring unreadable persisted user: {}", e);
                None
            }
        }
    }

    pub fn save_user(&self, user: &SessionUser) -> Result<()> {
        self.storage.set(USER_KEY, &serde_json::to_string(user)?)
    }

    /// Write a token pair and its user together
    pub fn save_session(&self, tokens: &TokenPair, user: &SessionUser) -> Result<()> {
        let user = serde_json::to_string(user)?;
        let mut changes = token_changes(tokens);
        changes.push(Change::Put(USER_KEY, &user));
        self.storage.write_batch(&changes)
    }

    /// Remove tokens and user, leaving unrelated keys alone
    pub fn clear_session(&self) -> Result<()> {
        self.storage.write_batch(&[
            Change::Delete(ACCESS_KEY),
            Change::Delete(REFRESH_KEY),
            Change::Delete(USER_KEY),
        ])
    }

    /// Wipe the whole namespace
    pub fn clear_all(&self) -> Result<()> {
        self.storage.clear()
    }

    /// Wipe the namespace and store a fresh pair in a single write
    pub fn reset_with_tokens(&self, tokens: &TokenPair) -> Result<()> {
        let existing = self.storage.keys();
        let mut changes: Vec<Change<'_>> = existing.iter().map(|k| Change::Delete(k.as_str())).collect();
        changes.extend(token_changes(tokens));
        self.storage.write_batch(&changes)
    }

    pub fn load_site_content(&self) -> Option<SiteContent> {
        let raw = self.storage.get(SITE_CONTENT_KEY)?;
        serde_json::from_str(&raw)
            .map_err(|e| tracing::warn!("Ignoring unreadable site content mirror: {}", e))
            .ok()
    }

    pub fn save_site_content(&self, content: &SiteContent) -> Result<()> {
        self.storage.set(SITE_CONTENT_KEY, &serde_json::to_string(content)?)
    }
}

fn token_changes(tokens: &TokenPair) -> Vec<Change<'_>> {
    let refresh = if tokens.refresh.is_empty() {
        Change::Delete(REFRESH_KEY)
    } else {
        Change::Put(REFRESH_KEY, &tokens.refresh)
    };
    vec![Change::Put(ACCESS_KEY, &tokens.access), refresh]
}
