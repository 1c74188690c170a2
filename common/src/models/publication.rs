// common/src/models/publication.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::id_as_string;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub summary: String,
    pub posted_at: DateTime<Utc>,
    #[serde(default)]
    pub posted_by: Option<Poster>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poster {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub name: String,
}

/// Body of `POST /api/publications`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPublication {
    pub title: String,
    #[serde(rename = "abstract")]
    pub summary: String,
}

impl NewPublication {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
        }
    }

    /// Name of the first required field that is blank
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.title.trim().is_empty() {
            Some("title")
        } else if self.summary.trim().is_empty() {
            Some("abstract")
        } else {
            None
        }
    }
}
