// site-client/src/lib.rs
pub mod auth;
pub mod client;
pub mod content;
pub mod error;
pub mod files;
pub mod oauth;
pub mod profile;
pub mod publications;
pub mod session;
pub mod session_store;
pub mod storage;
pub mod team;

pub use auth::{refresh_access_token, Authenticator};
pub use client::ApiClient;
pub use content::ContentManager;
pub use error::{ClientError, Result};
pub use oauth::{CommitPolicy, GoogleCallback, Navigation};
pub use session::{SessionContext, SessionWriter};
pub use session_store::SessionStore;
pub use storage::{Change, FileStore, KeyValueStore, MemoryStore, Storage};
