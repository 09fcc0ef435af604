use anyhow::Result;
use reqwest::Method;
use tracing::debug;

use super::client::ApiClient;
use super::types::TokenResponse;

impl ApiClient {
    /// Exchange a Google refresh token for a fresh access token
    pub async fn refresh_access_token(
        &self,
        token_uri: &str,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<TokenResponse> {
        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
        ];

        debug!("=== Token Refresh Request ===");
        let url = Self::build_url(token_uri, "")?;
        let token_response: TokenResponse = self
            .send_json(self.http().request(Method::POST, url).form(&form))
            .await?;

        if token_response.access_token.is_empty() {
            anyhow::bail!("Token response does not contain a valid 'access_token' field");
        }

        debug!("Successfully refreshed access token");
        Ok(token_response)
    }
}
