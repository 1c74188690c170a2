// common/src/models/session.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::Account;

/// JWT pair issued by the backend. Both values are opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    /// Staff and superusers both map to admin
    pub fn from_flags(is_staff: bool, is_superuser: bool) -> Self {
        if is_staff || is_superuser {
            Role::Admin
        } else {
            Role::Member
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Banned,
    Pending,
}

/// The signed-in user as the site keeps it, mirrored to storage under `user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    /// Display name, taken from the account username
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub verified: bool,
}

impl SessionUser {
    /// Normalize a backend account into the client user shape.
    ///
    /// `now` becomes the login time, and the creation time when the account
    /// carries no `date_joined`.
    pub fn from_account(account: &Account, now: DateTime<Utc>) -> Self {
        Self {
            id: account.id.clone(),
            email: account.email.clone(),
            name: account.username.clone(),
            role: Role::from_flags(account.is_staff, account.is_superuser),
            status: UserStatus::Active,
            last_login: Some(now),
            created_at: account.date_joined.unwrap_or(now),
            verified: true,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
