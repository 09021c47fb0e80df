//! Image assets referenced by a presence record
//!
//! Discovers the avatar and game image URLs and fetches them concurrently.
//! The renderer resolves image references through the resulting [`AssetMap`].

use std::collections::HashMap;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tracing::debug;

use crate::presence::PresenceResponse;

/// MIME type recorded for every fetched image
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// A fetched image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub url: String,
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// Fetched images keyed by source URL
pub type AssetMap = HashMap<String, ImageAsset>;

/// Image fetch errors
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to fetch image {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch image {url}: HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("image fetch task failed: {0}")]
    Join(#[from] JoinError),
}

/// Image URLs referenced by a presence record: the friend's avatar, then the
/// game icon if the game carries one. Each URL appears once.
pub fn collect_image_urls(record: &PresenceResponse) -> Vec<String> {
    let mut urls = vec![record.friend.image_uri.clone()];

    if let Some(uri) = record.friend.presence.game.image_uri() {
        if !urls.iter().any(|u| u == uri) {
            urls.push(uri.to_string());
        }
    }

    urls
}

/// Fetch one image
pub async fn fetch_image(client: &Client, url: String) -> Result<ImageAsset, AssetError> {
    debug!("Fetching image {}", url);

    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(source) => return Err(AssetError::Request { url, source }),
    };

    if !response.status().is_success() {
        let status = response.status();
        return Err(AssetError::Status { url, status });
    }

    let data = match response.bytes().await {
        Ok(data) => data,
        Err(source) => return Err(AssetError::Request { url, source }),
    };

    debug!("Fetched image {} ({} bytes)", url, data.len());

    Ok(ImageAsset {
        url,
        data: data.to_vec(),
        mime_type: IMAGE_MIME_TYPE.to_string(),
    })
}

/// Fetch every URL concurrently.
///
/// Returns once all fetches have succeeded, or on the first failure; the
/// remaining fetches are aborted when the task set is dropped.
pub async fn fetch_all(client: &Client, urls: &[String]) -> Result<AssetMap, AssetError> {
    let mut tasks = JoinSet::new();
    for url in urls {
        let client = client.clone();
        let url = url.clone();
        tasks.spawn(async move { fetch_image(&client, url).await });
    }

    let mut assets = AssetMap::with_capacity(urls.len());
    while let Some(joined) = tasks.join_next().await {
        let asset = joined??;
        assets.insert(asset.url.clone(), asset);
    }

    Ok(assets)
}
