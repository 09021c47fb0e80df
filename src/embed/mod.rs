//! Presence embed rendering
//!
//! Provides:
//! - Theme and output format resolution
//! - Friend code validation
//! - SVG embed composition and rasterization behind [`EmbedRenderer`]

mod raster;
mod svg;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::assets::AssetMap;
use crate::presence::PresenceResponse;

pub use raster::render_user_embed_image;
pub use svg::render_user_embed_svg;

/// MIME type of an unrasterized embed
pub const SVG_MIME_TYPE: &str = "image/svg+xml";

/// Colour scheme for the embed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Theme> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// Resolve a theme name, falling back to light for anything unrecognized
    pub fn resolve(s: &str) -> Theme {
        Self::from_str(s).unwrap_or_default()
    }
}

/// Requested output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
    Webp,
}

impl OutputFormat {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s {
            "svg" => Some(OutputFormat::Svg),
            "png" => Some(OutputFormat::Png),
            "jpeg" => Some(OutputFormat::Jpeg),
            "webp" => Some(OutputFormat::Webp),
            _ => None,
        }
    }

    /// Resolve a format name, falling back to SVG for anything unrecognized
    pub fn resolve(s: &str) -> OutputFormat {
        Self::from_str(s).unwrap_or_default()
    }

    /// The raster encoding for this format, or `None` for SVG
    pub fn raster(self) -> Option<RasterFormat> {
        match self {
            OutputFormat::Svg => None,
            OutputFormat::Png => Some(RasterFormat::Png),
            OutputFormat::Jpeg => Some(RasterFormat::Jpeg),
            OutputFormat::Webp => Some(RasterFormat::Webp),
        }
    }
}

/// Encodings produced by the rasterizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Png,
    Jpeg,
    Webp,
}

impl RasterFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            RasterFormat::Png => "image/png",
            RasterFormat::Jpeg => "image/jpeg",
            RasterFormat::Webp => "image/webp",
        }
    }
}

/// Validation errors for friend codes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid friend code: {0:?} (expected DDDD-DDDD-DDDD)")]
    InvalidFriendCode(String),
}

/// Three groups of four ASCII digits
static FRIEND_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{4}-[0-9]{4}$").unwrap());

/// A validated friend code, e.g. `1234-5678-9012`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendCode(String);

impl FriendCode {
    /// Validate a friend code.
    ///
    /// # Examples
    /// ```
    /// use presence_embed::embed::FriendCode;
    ///
    /// assert!(FriendCode::parse("1234-5678-9012").is_ok());
    /// assert!(FriendCode::parse("1234567890123").is_err());
    /// ```
    pub fn parse(code: &str) -> Result<FriendCode, ValidationError> {
        if FRIEND_CODE_REGEX.is_match(code) {
            Ok(FriendCode(code.to_string()))
        } else {
            Err(ValidationError::InvalidFriendCode(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FriendCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SW-{}", self.0)
    }
}

/// Presentation options passed through to the SVG composer
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedOptions {
    pub theme: Theme,
    pub friend_code: Option<FriendCode>,
    pub scale: f64,
    /// Remove border and use transparent background
    pub transparent: bool,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            friend_code: None,
            scale: 1.0,
            transparent: false,
        }
    }
}

/// A composed SVG embed
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedSvg {
    pub document: String,
    /// Output width in pixels (scale applied)
    pub width: f64,
    /// Output height in pixels (scale applied)
    pub height: f64,
}

/// Final encoded embed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// Errors raised while composing or rasterizing an embed
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no fetched image for {0}")]
    MissingAsset(String),

    #[error("failed to parse SVG: {0}")]
    Parse(#[from] resvg::usvg::Error),

    #[error("invalid embed size {0}x{1}")]
    InvalidSize(u32, u32),

    #[error("failed to encode PNG: {0}")]
    Png(String),

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Rendering capability used by the render command
pub trait EmbedRenderer: Send + Sync {
    /// Compose the vector embed
    fn render_svg(
        &self,
        record: &PresenceResponse,
        assets: &AssetMap,
        options: &EmbedOptions,
    ) -> Result<EmbedSvg, RenderError>;

    /// Rasterize a composed embed
    fn render_image(
        &self,
        svg: &EmbedSvg,
        format: RasterFormat,
    ) -> Result<RenderedOutput, RenderError>;
}

/// Built-in renderer: string-composed SVG, rasterized with resvg
#[derive(Debug, Clone, Copy, Default)]
pub struct ResvgRenderer;

impl EmbedRenderer for ResvgRenderer {
    fn render_svg(
        &self,
        record: &PresenceResponse,
        assets: &AssetMap,
        options: &EmbedOptions,
    ) -> Result<EmbedSvg, RenderError> {
        render_user_embed_svg(record, assets, options)
    }

    fn render_image(
        &self,
        svg: &EmbedSvg,
        format: RasterFormat,
    ) -> Result<RenderedOutput, RenderError> {
        render_user_embed_image(svg, format)
    }
}
