use std::sync::Arc;

use anyhow::Context;

use crate::assets::store::PreparedImage;
use crate::foundation::core::Canvas;
use crate::foundation::error::{PrismError, PrismResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Largest raster we are willing to allocate for an SVG.
const MAX_SVG_DIM: u32 = 16_384;

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> PrismResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> PrismResult<usvg::Tree> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Rasterize a parsed SVG, stretching it to `size` (or its intrinsic size when `None`).
pub fn rasterize_svg(tree: &usvg::Tree, size: Option<Canvas>) -> PrismResult<PreparedImage> {
    fn to_px(v: f32) -> PrismResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(PrismError::asset("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let (width, height) = match size {
        Some(c) => (c.width, c.height),
        None => (to_px(tree.size().width())?, to_px(tree.size().height())?),
    };
    if width == 0 || height == 0 || width > MAX_SVG_DIM || height > MAX_SVG_DIM {
        return Err(PrismError::asset(format!(
            "svg raster size out of range: {width}x{height} (max {MAX_SVG_DIM}x{MAX_SVG_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PrismError::asset("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    // tiny-skia pixmaps are already premultiplied RGBA8.
    resvg::render(tree, xform, &mut pixmap.as_mut());
    PreparedImage::from_premul(width, height, pixmap.data().to_vec())
}

/// Decode either an SVG document or a raster image, picking by the source's extension.
pub fn decode_source(
    source: &str,
    bytes: &[u8],
    svg_size: Option<Canvas>,
) -> PrismResult<PreparedImage> {
    if is_svg_source(source) {
        let tree = parse_svg(bytes)?;
        return rasterize_svg(&tree, svg_size);
    }
    decode_image(bytes)
}

/// Return `true` when `source` names an SVG document.
pub fn is_svg_source(source: &str) -> bool {
    std::path::Path::new(source)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
