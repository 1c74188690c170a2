// site-client/src/team.rs
use crate::client::ApiClient;
use crate::error::Result;
use common::models::TeamMember;
use reqwest::Method;

pub const TEAM_MEMBERS_PATH: &str = "/api/team-members/";

/// All active team members, or an empty list if anything goes wrong
pub async fn fetch_team_members(client: &ApiClient) -> Vec<TeamMember> {
    match try_fetch_team_members(client).await {
        Ok(members) => members,
        Err(e) => {
            tracing::error!("Error fetching team members: {}", e);
            Vec::new()
        }
    }
}

async fn try_fetch_team_members(client: &ApiClient) -> Result<Vec<TeamMember>> {
    let response = client.public(Method::GET, TEAM_MEMBERS_PATH).send().await?;
    ApiClient::read_json(response).await
}
