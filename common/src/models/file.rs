// common/src/models/file.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::id_as_string;
use super::publication::Poster;

/// A document uploaded through `/api/files`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub name: String,
    /// Download URL of the stored blob
    pub file: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub uploaded_by: Option<Poster>,
}
