/**
 * Chat HTTP API
 *
 * Thin wrapper over the server's endpoints:
 *
 * - `GET /messages?cursor=<id>` - long-poll feed
 * - `POST /messages` - publish (form-encoded `username`, `body`)
 * - `POST /messages/clear` - clear
 *
 * The feed request itself has no timeout here; the poller owns the abort
 * timer.
 */

use crate::client::config::Config;
use crate::client::error::ClientError;
use crate::shared::{Cursor, FeedResponse, SharedError};
use reqwest::{Client, Response};
use serde::Deserialize;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for one chat server
#[derive(Debug, Clone)]
pub struct ChatApi {
    client: Client,
    base_url: String,
}

impl ChatApi {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        Ok(Self::with_client(Client::builder().build()?, config.server_url()))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch everything after `cursor`, waiting server-side if there is nothing yet
    pub async fn fetch_feed(&self, cursor: Cursor) -> Result<FeedResponse, ClientError> {
        let response = self
            .client
            .get(self.url("/messages"))
            .query(&[("cursor", cursor.to_string())])
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json::<FeedResponse>().await?)
    }

    /// Publish a message
    ///
    /// Empty input is rejected locally and never sent.
    pub async fn publish(&self, username: &str, body: &str) -> Result<(), ClientError> {
        if username.trim().is_empty() {
            return Err(SharedError::validation("username", "Please enter a username").into());
        }
        if body.trim().is_empty() {
            return Err(SharedError::validation("body", "Please enter a message").into());
        }

        let response = self
            .client
            .post(self.url("/messages"))
            .form(&[("username", username), ("body", body)])
            .send()
            .await?;

        check_status(response).await?;
        tracing::debug!("[Publish] Sent message as {}", username);
        Ok(())
    }

    /// Drop the whole conversation
    pub async fn clear(&self) -> Result<(), ClientError> {
        let response = self.client.post(self.url("/messages/clear")).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into `ClientError::Server`
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}
