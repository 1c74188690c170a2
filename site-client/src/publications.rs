// site-client/src/publications.rs
use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use common::models::{NewPublication, Publication};
use reqwest::Method;

pub const PUBLICATIONS_PATH: &str = "/api/publications";

fn publication_path(id: &str) -> String {
    format!("{}/{}", PUBLICATIONS_PATH, id)
}

/// Newest first, as ordered by the server
pub async fn list_publications(client: &ApiClient) -> Result<Vec<Publication>> {
    let response = client.public(Method::GET, PUBLICATIONS_PATH).send().await?;
    ApiClient::read_json(response)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch publications: {}", e);
            e
        })
}

pub async fn get_publication(client: &ApiClient, id: &str) -> Result<Publication> {
    let response = client.public(Method::GET, &publication_path(id)).send().await?;
    ApiClient::read_json(response).await
}

pub async fn create_publication(client: &ApiClient, data: &NewPublication) -> Result<Publication> {
    if let Some(field) = data.missing_field() {
        return Err(ClientError::Invalid(format!("{} is required", field)));
    }

    let response = client
        .authorized(Method::POST, PUBLICATIONS_PATH)
        .json(data)
        .send()
        .await?;
    ApiClient::read_json(response)
        .await
        .map_err(|e| {
            tracing::error!("Create publication error: {}", e);
            e
        })
}

/// Only the author may delete; the server answers 403 otherwise
pub async fn delete_publication(client: &ApiClient, id: &str) -> Result<()> {
    let response = client
        .authorized(Method::DELETE, &publication_path(id))
        .send()
        .await?;
    ApiClient::read_empty(response).await
}
