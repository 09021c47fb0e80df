//! render-presence-embed - write a presence embed to stdout

use anyhow::{Context, Result};
use clap::Parser;
use presence_embed::{presence::PresenceClient, Cli, Config, RenderCommand};
use tracing::info_span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout carries the image
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "presence_embed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let client = PresenceClient::new(&config)?;

    let command = RenderCommand::new(client).with_span(info_span!(
        "render_presence_embed",
        url = %cli.url
    ));

    command
        .execute(&cli, &mut std::io::stdout(), &mut std::io::stderr())
        .await?;

    Ok(())
}
