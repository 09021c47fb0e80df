//! The `render-presence-embed` command
//!
//! Validates arguments, looks up the presence record, fetches the images it
//! references and hands everything to an [`EmbedRenderer`].

use std::io::Write;

use tracing::{debug, info, info_span, Instrument, Span};

use crate::assets::{self, collect_image_urls};
use crate::cli::Cli;
use crate::embed::{
    EmbedOptions, EmbedRenderer, FriendCode, OutputFormat, RenderedOutput, ResvgRenderer, Theme,
    SVG_MIME_TYPE,
};
use crate::error::EmbedError;
use crate::presence::{PresenceClient, PresenceResponse};

/// Renders presence embeds.
///
/// Logging goes through the span supplied with [`RenderCommand::with_span`]
/// and the diagnostics writer passed to [`RenderCommand::execute`].
pub struct RenderCommand<R = ResvgRenderer> {
    client: PresenceClient,
    renderer: R,
    span: Span,
}

impl RenderCommand<ResvgRenderer> {
    /// Create a command using the built-in renderer
    pub fn new(client: PresenceClient) -> Self {
        Self::with_renderer(client, ResvgRenderer)
    }
}

impl<R: EmbedRenderer> RenderCommand<R> {
    /// Create a command with a custom renderer
    pub fn with_renderer(client: PresenceClient, renderer: R) -> Self {
        Self {
            client,
            renderer,
            span: info_span!("render_presence_embed"),
        }
    }

    /// Replace the tracing span the command runs in
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// The renderer used for composition and rasterization
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render the embed described by `cli`, write it to `out` and report the
    /// MIME type on `diagnostics`.
    ///
    /// Nothing is written to `out` unless rendering succeeded.
    pub async fn execute<W, D>(
        &self,
        cli: &Cli,
        out: &mut W,
        diagnostics: &mut D,
    ) -> Result<(), EmbedError>
    where
        W: Write,
        D: Write,
    {
        let output = self.render(cli).instrument(self.span.clone()).await?;

        writeln!(diagnostics, "output type {}", output.mime_type)?;
        out.write_all(&output.data)?;
        out.flush()?;

        Ok(())
    }

    /// Produce the encoded embed without writing it anywhere
    pub async fn render(&self, cli: &Cli) -> Result<RenderedOutput, EmbedError> {
        let theme = Theme::resolve(&cli.theme);
        let format = OutputFormat::resolve(&cli.output);

        // An empty friend code is treated as absent
        let friend_code = cli
            .friend_code
            .as_deref()
            .filter(|code| !code.is_empty())
            .map(FriendCode::parse)
            .transpose()?;

        let (presence, user, data) = self.client.get_presence_from_url(&cli.url).await?;
        info!(
            "Rendering presence embed for '{}' ({:?})",
            user.name, presence.state
        );
        let record: PresenceResponse = serde_json::from_value(data)?;

        let image_urls = collect_image_urls(&record);
        debug!("images {:?}", image_urls);

        let assets = assets::fetch_all(self.client.http(), &image_urls).await?;

        let options = EmbedOptions {
            theme,
            friend_code,
            scale: cli.scale,
            transparent: cli.transparent,
        };
        let svg = self.renderer.render_svg(&record, &assets, &options)?;

        let output = match format.raster() {
            Some(raster) => self.renderer.render_image(&svg, raster)?,
            None => RenderedOutput {
                data: svg.document.into_bytes(),
                mime_type: SVG_MIME_TYPE.to_string(),
            },
        };

        info!("Rendered {} ({} bytes)", output.mime_type, output.data.len());
        Ok(output)
    }
}
