//! SVG embed composition

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use super::{EmbedOptions, EmbedSvg, RenderError, Theme};
use crate::assets::AssetMap;
use crate::presence::{Game, PresenceResponse, PresenceState};

const WIDTH: f64 = 500.0;
const HEIGHT: f64 = 120.0;
const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";
const ONLINE_COLOUR: &str = "#2fb85b";

struct Palette {
    background: &'static str,
    border: &'static str,
    text: &'static str,
    secondary: &'static str,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                background: "#ffffff",
                border: "#d6d6d6",
                text: "#1b1b1b",
                secondary: "#6f6f6f",
            },
            Theme::Dark => Palette {
                background: "#1f2023",
                border: "#3a3b3f",
                text: "#f2f2f2",
                secondary: "#a5a5a5",
            },
        }
    }
}

/// Compose the embed for a presence record.
///
/// Every image the record references must be present in `assets`.
pub fn render_user_embed_svg(
    record: &PresenceResponse,
    assets: &AssetMap,
    options: &EmbedOptions,
) -> Result<EmbedSvg, RenderError> {
    let friend = &record.friend;
    let presence = &friend.presence;
    let palette = Palette::for_theme(options.theme);

    let width = WIDTH * options.scale;
    let height = HEIGHT * options.scale;

    let avatar = data_uri(assets, &friend.image_uri)?;
    let game = presence.game.game();
    let game_icon = match game {
        Some(game) => Some(data_uri(assets, &game.image_uri)?),
        None => None,
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    ));
    svg.push_str(
        r#"<defs><clipPath id="avatar-clip"><rect x="20" y="20" width="80" height="80" rx="10"/></clipPath><clipPath id="game-clip"><rect x="120" y="58" width="30" height="30" rx="5"/></clipPath></defs>"#,
    );

    if !options.transparent {
        svg.push_str(&format!(
            r#"<rect x="0.5" y="0.5" width="{}" height="{}" rx="12" fill="{}" stroke="{}" stroke-width="1"/>"#,
            WIDTH - 1.0,
            HEIGHT - 1.0,
            palette.background,
            palette.border
        ));
    }

    svg.push_str(&format!(
        r#"<image x="20" y="20" width="80" height="80" clip-path="url(#avatar-clip)" preserveAspectRatio="xMidYMid slice" href="{avatar}"/>"#
    ));

    svg.push_str(&format!(
        r#"<text x="120" y="46" font-family="{FONT_FAMILY}" font-size="22" font-weight="bold" fill="{}">{}</text>"#,
        palette.text,
        escape_xml(&friend.name)
    ));

    match (game, game_icon) {
        (Some(game), Some(icon)) => {
            svg.push_str(&format!(
                r#"<image x="120" y="58" width="30" height="30" clip-path="url(#game-clip)" preserveAspectRatio="xMidYMid slice" href="{icon}"/>"#
            ));
            let (label, colour) = if presence.state.is_online() {
                ("Playing", ONLINE_COLOUR)
            } else {
                ("Last played", palette.secondary)
            };
            svg.push_str(&format!(
                r#"<text x="160" y="79" font-family="{FONT_FAMILY}" font-size="16" fill="{}"><tspan fill="{colour}">{label}</tspan> {}</text>"#,
                palette.text,
                escape_xml(&game.name)
            ));
            svg.push_str(&format!(
                r#"<text x="120" y="106" font-family="{FONT_FAMILY}" font-size="13" fill="{}">{}</text>"#,
                palette.secondary,
                play_time_label(game)
            ));
        }
        _ => {
            let (label, colour) = match presence.state {
                PresenceState::Playing | PresenceState::Online => ("Online", ONLINE_COLOUR),
                PresenceState::Inactive => ("Inactive", palette.secondary),
                PresenceState::Offline => ("Offline", palette.secondary),
            };
            svg.push_str(&format!(
                r#"<circle cx="126" cy="74" r="5" fill="{colour}"/><text x="138" y="79" font-family="{FONT_FAMILY}" font-size="16" fill="{}">{label}</text>"#,
                palette.text
            ));
        }
    }

    if let Some(code) = &options.friend_code {
        svg.push_str(&format!(
            r#"<text x="480" y="106" text-anchor="end" font-family="{FONT_FAMILY}" font-size="13" fill="{}">{code}</text>"#,
            palette.secondary
        ));
    }

    svg.push_str("</svg>");

    Ok(EmbedSvg {
        document: svg,
        width,
        height,
    })
}

fn data_uri(assets: &AssetMap, url: &str) -> Result<String, RenderError> {
    let asset = assets
        .get(url)
        .ok_or_else(|| RenderError::MissingAsset(url.to_string()))?;
    Ok(format!(
        "data:{};base64,{}",
        asset.mime_type,
        BASE64.encode(&asset.data)
    ))
}

fn play_time_label(game: &Game) -> String {
    match game.total_play_time / 60 {
        0 => "Played for a little while".to_string(),
        1 => "Played for 1 hour".to_string(),
        hours => format!("Played for {} hours", hours),
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
