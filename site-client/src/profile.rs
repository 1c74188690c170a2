// site-client/src/profile.rs
use crate::auth::USER_PATH;
use crate::client::ApiClient;
use crate::error::Result;
use common::models::{Account, UserProfile};
use reqwest::multipart::{Form, Part};
use reqwest::Method;

pub const PROFILE_PATH: &str = "/api/user/profile/";

pub async fn get_current_user(client: &ApiClient) -> Result<Account> {
    let token = client.require_token()?;
    let response = client.with_token(Method::GET, USER_PATH, &token).send().await?;
    ApiClient::read_json(response).await
}

pub async fn get_user_profile(client: &ApiClient) -> Result<UserProfile> {
    let token = client.require_token()?;
    let response = client.with_token(Method::GET, PROFILE_PATH, &token).send().await?;
    ApiClient::read_json(response).await
}

/// Partial update; only the fields set on `changes` are sent
pub async fn update_user_profile(client: &ApiClient, changes: &UserProfile) -> Result<UserProfile> {
    let token = client.require_token()?;
    let response = client
        .with_token(Method::PATCH, PROFILE_PATH, &token)
        .json(changes)
        .send()
        .await?;
    ApiClient::read_json(response).await
}

/// Multipart upload of a new avatar under the `profile_image` field
pub async fn upload_profile_image(
    client: &ApiClient,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<UserProfile> {
    let token = client.require_token()?;
    let form = Form::new().part("profile_image", file_part(file_name, bytes)?);

    tracing::debug!("Uploading profile image {}", file_name);

    let response = client
        .with_token(Method::PATCH, PROFILE_PATH, &token)
        .multipart(form)
        .send()
        .await?;
    ApiClient::read_json(response).await
}

/// File part with a MIME type guessed from the name
pub(crate) fn file_part(file_name: &str, bytes: Vec<u8>) -> Result<Part> {
    let mime = mime_guess::from_path(file_name).first_or_octet_stream();
    Ok(Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str(mime.as_ref())?)
}
