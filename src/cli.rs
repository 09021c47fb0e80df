//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

/// Render presence embed
#[derive(Parser, Debug, Clone)]
#[command(
    name = "render-presence-embed",
    version,
    about = "Render presence embed"
)]
pub struct Cli {
    /// Presence URL
    pub url: String,

    /// Output (svg, png, jpeg or webp)
    #[arg(long, default_value = "svg")]
    pub output: String,

    /// Theme (light or dark)
    #[arg(long, default_value = "light")]
    pub theme: String,

    /// Friend code
    #[arg(long)]
    pub friend_code: Option<String>,

    /// Image scale
    #[arg(long, default_value_t = 1.0, value_parser = parse_scale)]
    pub scale: f64,

    /// Remove border and use transparent background
    #[arg(long)]
    pub transparent: bool,

    /// Path to a TOML configuration file
    #[arg(long, env = "PRESENCE_EMBED_CONFIG")]
    pub config: Option<PathBuf>,
}

fn parse_scale(s: &str) -> Result<f64, String> {
    let scale: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(format!("scale must be a positive number, got {}", s))
    }
}
