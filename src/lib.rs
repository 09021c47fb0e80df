//! presence-embed - render presence status embeds
//!
//! Looks up a user's presence from a presence proxy URL and renders it as an
//! SVG, PNG, JPEG or WEBP embed.

pub mod assets;
pub mod cli;
pub mod command;
pub mod config;
pub mod embed;
pub mod error;
pub mod presence;

pub use cli::Cli;
pub use command::RenderCommand;
pub use config::Config;
pub use error::EmbedError;
