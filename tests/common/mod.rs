//! Common test utilities - mock presence proxy and recording renderer

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use presence_embed::assets::AssetMap;
use presence_embed::embed::{
    render_user_embed_svg, EmbedOptions, EmbedRenderer, EmbedSvg, RasterFormat, RenderError,
    RenderedOutput,
};
use presence_embed::presence::{PresenceClient, PresenceResponse};
use presence_embed::Config;
use resvg::tiny_skia;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Bytes returned by [`RecordingRenderer::render_image`]
pub const RASTER_BYTES: &[u8] = b"rasterized-embed";

#[derive(Clone)]
struct ProxyState {
    presence: Value,
    images: Arc<HashMap<String, Vec<u8>>>,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl ProxyState {
    fn record(&self, path: String) {
        *self.hits.lock().unwrap().entry(path).or_default() += 1;
    }
}

/// Presence proxy and image host on a random local port.
///
/// Serves:
/// - `GET /presence` - the configured presence record
/// - `GET /broken` - always 500
/// - `GET /images/{name}` - `avatar.jpg` and `game.jpg`, 404 otherwise
pub struct MockProxy {
    pub addr: SocketAddr,
    hits: Arc<Mutex<HashMap<String, usize>>>,
    images: Arc<HashMap<String, Vec<u8>>>,
    handle: JoinHandle<()>,
}

impl MockProxy {
    /// Start a proxy; `presence` builds the record from the server's base URL
    pub async fn start(presence: impl FnOnce(&str) -> Value) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let base_url = format!("http://{}", addr);

        let mut images = HashMap::new();
        images.insert("avatar.jpg".to_string(), test_image(8, 8));
        images.insert("game.jpg".to_string(), test_image(4, 4));
        let images = Arc::new(images);

        let hits = Arc::new(Mutex::new(HashMap::new()));
        let state = ProxyState {
            presence: presence(&base_url),
            images: images.clone(),
            hits: hits.clone(),
        };

        let router = Router::new()
            .route("/presence", get(get_presence))
            .route("/broken", get(get_broken))
            .route("/images/{name}", get(get_image))
            .with_state(state);

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                eprintln!("Mock proxy error: {}", e);
            }
        });

        Ok(Self {
            addr,
            hits,
            images,
            handle,
        })
    }

    /// Get the base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Number of requests served for a path
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    /// Total number of requests served
    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }

    /// Bytes served for an image name
    pub fn image(&self, name: &str) -> Vec<u8> {
        self.images[name].clone()
    }
}

impl Drop for MockProxy {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn get_presence(State(state): State<ProxyState>) -> impl IntoResponse {
    state.record("/presence".to_string());
    Json(state.presence.clone())
}

async fn get_broken(State(state): State<ProxyState>) -> impl IntoResponse {
    state.record("/broken".to_string());
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream unavailable")
}

async fn get_image(Path(name): Path<String>, State(state): State<ProxyState>) -> Response {
    state.record(format!("/images/{}", name));
    match state.images.get(&name) {
        Some(data) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "image/png")],
            data.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Image not found").into_response(),
    }
}

/// A small solid PNG
fn test_image(width: u32, height: u32) -> Vec<u8> {
    let mut pixmap = tiny_skia::Pixmap::new(width, height).unwrap();
    pixmap.fill(tiny_skia::Color::from_rgba8(200, 40, 40, 255));
    pixmap.encode_png().unwrap()
}

/// Presence record for a friend, with `game` as the presence's game entry
pub fn presence_record(base_url: &str, state: &str, game: Value) -> Value {
    json!({
        "friend": {
            "id": 42,
            "nsaId": "abcdef0123456789",
            "imageUri": format!("{}/images/avatar.jpg", base_url),
            "name": "Isabelle",
            "isFriend": true,
            "isFavoriteFriend": true,
            "isServiceUser": true,
            "friendCreatedAt": 1600000000,
            "presence": {
                "state": state,
                "updatedAt": 1700000000,
                "logoutAt": 0,
                "game": game
            }
        },
        "title": null
    })
}

/// Game entry whose icon is served at `/images/{image}`
pub fn game(base_url: &str, image: &str) -> Value {
    json!({
        "name": "Animal Crossing: New Horizons",
        "imageUri": format!("{}/images/{}", base_url, image),
        "shopUri": "https://shop.example/acnh",
        "totalPlayTime": 7200,
        "firstPlayedAt": 1585000000,
        "sysDescription": ""
    })
}

/// Presence client with default configuration
pub fn client() -> PresenceClient {
    PresenceClient::new(&Config::default()).expect("Failed to build client")
}

/// Arguments captured from a `render_svg` call
#[derive(Debug, Clone)]
pub struct SvgCall {
    pub record: PresenceResponse,
    pub assets: AssetMap,
    pub options: EmbedOptions,
    pub svg: EmbedSvg,
}

/// Renderer that composes with the built-in SVG composer, returns
/// [`RASTER_BYTES`] for raster output, and records every call
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub svg_calls: Mutex<Vec<SvgCall>>,
    pub image_calls: Mutex<Vec<(EmbedSvg, RasterFormat)>>,
}

impl RecordingRenderer {
    pub fn svg_calls(&self) -> Vec<SvgCall> {
        self.svg_calls.lock().unwrap().clone()
    }

    pub fn image_calls(&self) -> Vec<(EmbedSvg, RasterFormat)> {
        self.image_calls.lock().unwrap().clone()
    }
}

impl EmbedRenderer for RecordingRenderer {
    fn render_svg(
        &self,
        record: &PresenceResponse,
        assets: &AssetMap,
        options: &EmbedOptions,
    ) -> Result<EmbedSvg, RenderError> {
        let svg = render_user_embed_svg(record, assets, options)?;
        self.svg_calls.lock().unwrap().push(SvgCall {
            record: record.clone(),
            assets: assets.clone(),
            options: options.clone(),
            svg: svg.clone(),
        });
        Ok(svg)
    }

    fn render_image(
        &self,
        svg: &EmbedSvg,
        format: RasterFormat,
    ) -> Result<RenderedOutput, RenderError> {
        self.image_calls.lock().unwrap().push((svg.clone(), format));
        Ok(RenderedOutput {
            data: RASTER_BYTES.to_vec(),
            mime_type: format.mime_type().to_string(),
        })
    }
}
