//! Errors surfaced by the render command

use thiserror::Error;

use crate::assets::AssetError;
use crate::embed::{RenderError, ValidationError};
use crate::presence::PresenceError;

/// Render command errors
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("presence lookup failed: {0}")]
    Lookup(#[from] PresenceError),

    #[error("unexpected presence record: {0}")]
    Record(#[from] serde_json::Error),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
