//! Embed rasterization
//!
//! SVG documents are rendered with resvg. PNG is encoded by tiny-skia,
//! JPEG and WEBP by the `image` crate.

use std::io::Cursor;

use image::{ImageFormat, RgbImage, RgbaImage};
use resvg::{tiny_skia, usvg};
use tracing::debug;

use super::{EmbedSvg, RasterFormat, RenderError, RenderedOutput};

/// Rasterize a composed embed
pub fn render_user_embed_image(
    svg: &EmbedSvg,
    format: RasterFormat,
) -> Result<RenderedOutput, RenderError> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(&svg.document, &options)?;
    let (width, height) = (svg.width.ceil() as u32, svg.height.ceil() as u32);

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RenderError::InvalidSize(width, height))?;

    // Fit the document onto the embed's pixel size
    let size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    debug!("Rasterized embed at {}x{} as {:?}", width, height, format);

    let data = match format {
        RasterFormat::Png => pixmap
            .encode_png()
            .map_err(|e| RenderError::Png(e.to_string()))?,
        RasterFormat::Jpeg => {
            let image = RgbImage::from_raw(width, height, flatten(&pixmap))
                .ok_or(RenderError::InvalidSize(width, height))?;
            let mut buf = Cursor::new(Vec::new());
            image.write_to(&mut buf, ImageFormat::Jpeg)?;
            buf.into_inner()
        }
        RasterFormat::Webp => {
            let image = RgbaImage::from_raw(width, height, demultiply(&pixmap))
                .ok_or(RenderError::InvalidSize(width, height))?;
            let mut buf = Cursor::new(Vec::new());
            image.write_to(&mut buf, ImageFormat::WebP)?;
            buf.into_inner()
        }
    };

    Ok(RenderedOutput {
        data,
        mime_type: format.mime_type().to_string(),
    })
}

/// Straight-alpha RGBA from tiny-skia's premultiplied pixels
fn demultiply(pixmap: &tiny_skia::Pixmap) -> Vec<u8> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    data
}

/// RGB composited over white, for formats without alpha
fn flatten(pixmap: &tiny_skia::Pixmap) -> Vec<u8> {
    let mut data = Vec::with_capacity(pixmap.pixels().len() * 3);
    for pixel in pixmap.pixels() {
        let white = 255 - pixel.alpha();
        data.extend_from_slice(&[
            pixel.red() + white,
            pixel.green() + white,
            pixel.blue() + white,
        ]);
    }
    data
}
