use crate::assets::resource::ImageResource;
use crate::foundation::core::{Canvas, Rect};
use crate::foundation::error::PrismResult;
use crate::render::surface::{CompositeMode, Saved, Surface};

/// Destination rect of the mask: `container` centered on the surface.
pub fn mask_rect(surface: Canvas, container: Canvas) -> Rect {
    let (sw, sh) = (f64::from(surface.width), f64::from(surface.height));
    let (cw, ch) = (f64::from(container.width), f64::from(container.height));
    Rect::from_origin_size(((sw - cw) / 2.0, (sh - ch) / 2.0), (cw, ch))
}

/// Draw the mask centered on the surface, replacing whatever was there.
///
/// Later slide draws composite `SourceAtop` and so stay confined to the mask's coverage. Drawing
/// in `Copy` mode makes repeated calls produce the same surface.
pub fn render_mask<S: Surface + ?Sized>(
    surface: &mut S,
    mask: &ImageResource,
    container: Canvas,
) -> PrismResult<()> {
    let dest = mask_rect(surface.size(), container);
    let mut s = Saved::new(surface);
    s.set_composite(CompositeMode::Copy);
    s.draw_image(mask, dest)
}

#[cfg(test)]
#[path = "../../tests/unit/engine/mask.rs"]
mod tests;
