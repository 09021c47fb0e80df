//! Presence proxy client

use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::{Friend, Presence};
use crate::config::Config;

/// Presence lookup errors
#[derive(Debug, Error)]
pub enum PresenceError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("presence proxy returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse presence response: {0}")]
    Json(#[source] reqwest::Error),

    #[error("invalid presence data: {0}")]
    InvalidData(String),
}

/// HTTP client for the presence proxy.
///
/// The underlying [`Client`] is also used for image fetches so a single
/// invocation shares one connection pool.
#[derive(Debug, Clone)]
pub struct PresenceClient {
    client: Client,
}

impl PresenceClient {
    /// Create a client from configuration
    pub fn new(config: &Config) -> Result<Self, PresenceError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build().map_err(PresenceError::Client)?,
        })
    }

    /// The shared HTTP client
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// Fetch a presence URL.
    ///
    /// Returns the presence, the user it belongs to, and the raw record. The
    /// user is read from `user` or `friend`; the presence from the top-level
    /// `presence` key or the user's own.
    pub async fn get_presence_from_url(
        &self,
        url: &str,
    ) -> Result<(Presence, Friend, Value), PresenceError> {
        debug!("Fetching presence from {}", url);

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| PresenceError::Request {
                url: url.to_string(),
                source,
            })?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Presence proxy error: {} - {}", status, body);
            return Err(PresenceError::Status { status, body });
        }

        let data: Value = response.json().await.map_err(PresenceError::Json)?;
        let (presence, user) = split_presence(&data)?;

        Ok((presence, user, data))
    }
}

/// Locate the user and presence entries in a proxy response
fn split_presence(data: &Value) -> Result<(Presence, Friend), PresenceError> {
    let user = data
        .get("user")
        .or_else(|| data.get("friend"))
        .ok_or_else(|| PresenceError::InvalidData("missing user".to_string()))?;

    let presence = data
        .get("presence")
        .or_else(|| user.get("presence"))
        .ok_or_else(|| PresenceError::InvalidData("missing presence".to_string()))?;

    let presence: Presence = serde_json::from_value(presence.clone())
        .map_err(|e| PresenceError::InvalidData(format!("presence: {}", e)))?;
    let user: Friend = serde_json::from_value(user.clone())
        .map_err(|e| PresenceError::InvalidData(format!("user: {}", e)))?;

    Ok((presence, user))
}
