// site-client/src/content.rs
// Server keeps contact and footer only; the whole tree is mirrored locally

use crate::client::ApiClient;
use crate::error::Result;
use crate::session::SessionContext;
use common::models::{ContentPatch, SiteContent, SiteContentRecord};
use reqwest::Method;

pub const SITE_CONTENT_PATH: &str = "/api/site-content/";

#[derive(Debug)]
pub struct ContentManager {
    client: ApiClient,
    session: SessionContext,
    content: SiteContent,
}

impl ContentManager {
    pub fn new(client: ApiClient, session: SessionContext) -> Self {
        Self {
            client,
            session,
            content: SiteContent::default(),
        }
    }

    pub fn content(&self) -> &SiteContent {
        &self.content
    }

    /// Editing is reserved to admins of the current session
    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    /// Server contact/footer over the defaults; on any failure, the local
    /// mirror; failing that, the defaults.
    pub async fn load(&mut self) -> &SiteContent {
        match self.fetch_record().await {
            Ok(record) => {
                let mut content = SiteContent::default();
                record.apply_to(&mut content);
                self.content = content;
            }
            Err(e) => {
                tracing::warn!("Site content unavailable from server, using local copy: {}", e);
                if let Some(saved) = self.client.store().load_site_content() {
                    self.content = saved;
                }
            }
        }
        &self.content
    }

    /// Apply an edit locally and mirror it, then push the server-owned
    /// sections. Server failures are logged and otherwise ignored.
    pub async fn update(&mut self, patch: ContentPatch) -> Result<()> {
        patch.apply_to(&mut self.content);
        self.client.store().save_site_content(&self.content)?;

        let record = SiteContentRecord::from_patch(&patch);
        let sent = self
            .client
            .authorized(Method::PUT, SITE_CONTENT_PATH)
            .json(&record)
            .send()
            .await;

        match sent {
            Ok(response) => {
                if let Err(e) = ApiClient::read_empty(response).await {
                    tracing::warn!("Server rejected site content update: {}", e);
                }
            }
            Err(e) => tracing::warn!("Site content update not delivered: {}", e),
        }
        Ok(())
    }

    async fn fetch_record(&self) -> Result<SiteContentRecord> {
        let response = self
            .client
            .authorized(Method::GET, SITE_CONTENT_PATH)
            .send()
            .await?;
        ApiClient::read_json(response).await
    }
}
