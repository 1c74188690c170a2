// site-client/src/files.rs
use crate::client::ApiClient;
use crate::error::Result;
use crate::profile::file_part;
use common::models::StoredFile;
use reqwest::multipart::Form;
use reqwest::Method;

pub const FILES_PATH: &str = "/api/files";

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

pub async fn list_files(client: &ApiClient) -> Result<Vec<StoredFile>> {
    let response = client.authorized(Method::GET, FILES_PATH).send().await?;
    ApiClient::read_json(response).await
}

pub async fn upload_file(client: &ApiClient, file_name: &str, bytes: Vec<u8>) -> Result<StoredFile> {
    let form = Form::new()
        .part("file", file_part(file_name, bytes)?)
        .text("name", file_name.to_string());

    let response = client
        .authorized(Method::POST, FILES_PATH)
        .multipart(form)
        .send()
        .await?;
    ApiClient::read_json(response).await
}

pub async fn delete_file(client: &ApiClient, id: &str) -> Result<()> {
    let response = client
        .authorized(Method::DELETE, &format!("{}/{}", FILES_PATH, id))
        .send()
        .await?;
    ApiClient::read_empty(response).await
}

/// Fetch the blob behind a `StoredFile::file` URL
pub async fn download_file(client: &ApiClient, url: &str) -> Result<Vec<u8>> {
    let response = client.absolute(Method::GET, url).send().await?;
    let response = ApiClient::check(response).await?;
    Ok(response.bytes().await?.to_vec())
}

/// Human readable size with up to two decimals: `1536` -> `"1.5 KB"`
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}
