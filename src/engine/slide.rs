use crate::assets::resource::ImageResource;
use crate::engine::config::{FlipAxis, MaskEffects};
use crate::foundation::core::Rect;
use crate::foundation::error::PrismResult;
use crate::render::surface::{CompositeMode, Saved, Surface};

/// Horizontal position of slide `index` when the strip has advanced to `progress`.
///
/// Missing or non-finite progress is treated as `0` (the strip's home position).
pub fn slide_x(surface_width: f64, index: usize, progress: Option<f64>) -> f64 {
    let progress = progress.filter(|p| p.is_finite()).unwrap_or(0.0);
    surface_width * (index as f64 - progress)
}

/// Draw slide `index` at its strip position, full surface size.
///
/// With `mask` set the draw composites `SourceAtop` (confined to the mask's coverage) under the
/// mask's effects. Any state change made here is undone before returning, except the composite
/// mode which stays `SourceAtop` for the layer's lifetime.
pub fn render_slide<S: Surface + ?Sized>(
    surface: &mut S,
    slide: &ImageResource,
    index: usize,
    progress: Option<f64>,
    mask: Option<&MaskEffects>,
) -> PrismResult<()> {
    let (w, h) = (surface.width(), surface.height());
    let dest = Rect::from_origin_size((slide_x(w, index, progress), 0.0), (w, h));

    let Some(effects) = mask else {
        return surface.draw_image(slide, dest);
    };

    surface.set_composite(CompositeMode::SourceAtop);
    let mut s = Saved::new(surface);
    apply_effects(&mut *s, effects);
    s.draw_image(slide, dest)
}

/// Apply mask effects to the current transform: flip first, then rotation about the center.
pub fn apply_effects<S: Surface + ?Sized>(surface: &mut S, effects: &MaskEffects) {
    let (w, h) = (surface.width(), surface.height());
    match effects.flip {
        Some(FlipAxis::Horizontal) => {
            surface.translate(w, 0.0);
            surface.scale(-1.0, 1.0);
        }
        Some(FlipAxis::Vertical) => {
            surface.translate(0.0, h);
            surface.scale(1.0, -1.0);
        }
        None => {}
    }
    if effects.rotate > 0.0 {
        surface.translate(w / 2.0, h / 2.0);
        surface.rotate(effects.rotate.to_radians());
        surface.translate(-w / 2.0, -h / 2.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/slide.rs"]
mod tests;
