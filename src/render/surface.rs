use std::ops::{Deref, DerefMut};

use crate::assets::resource::ImageResource;
use crate::foundation::core::{Affine, Canvas, Rect};
use crate::foundation::error::PrismResult;

/// How newly drawn pixels combine with what is already on the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompositeMode {
    /// Draw over existing content.
    #[default]
    SourceOver,
    /// Draw only where the surface already has coverage; keep the existing alpha.
    SourceAtop,
    /// Replace the surface contents with the drawn layer.
    Copy,
}

/// The part of a surface's drawing state that `save`/`restore` captures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceState {
    /// Current transform, applied to every draw.
    pub transform: Affine,
    /// Current composite mode.
    pub composite: CompositeMode,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            composite: CompositeMode::SourceOver,
        }
    }
}

/// Current state plus the stack of saved states.
///
/// Transforms post-multiply the current matrix, so the most recently applied transform acts on
/// drawn geometry first (2D canvas semantics).
#[derive(Clone, Debug, Default)]
pub struct StateStack {
    current: SurfaceState,
    saved: Vec<SurfaceState>,
}

impl StateStack {
    /// Active state.
    pub fn current(&self) -> SurfaceState {
        self.current
    }

    /// Number of outstanding saves.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Push the active state.
    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Pop the most recent save. An unbalanced restore is ignored.
    pub fn restore(&mut self) {
        if let Some(s) = self.saved.pop() {
            self.current = s;
        }
    }

    /// Replace the composite mode.
    pub fn set_composite(&mut self, mode: CompositeMode) {
        self.current.composite = mode;
    }

    /// Append a translation.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.current.transform = self.current.transform * Affine::translate((dx, dy));
    }

    /// Append a (possibly non-uniform) scale.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.current.transform = self.current.transform * Affine::scale_non_uniform(sx, sy);
    }

    /// Append a clockwise rotation (y axis pointing down).
    pub fn rotate(&mut self, radians: f64) {
        self.current.transform = self.current.transform * Affine::rotate(radians);
    }
}

/// A 2D drawing target sized to one layer's container.
///
/// This is the capability the slide and mask renderers draw through; it carries no algorithmic
/// content of its own.
pub trait Surface {
    /// Create a blank (fully transparent) surface.
    fn create(size: Canvas) -> PrismResult<Self>
    where
        Self: Sized;

    /// Surface dimensions.
    fn size(&self) -> Canvas;

    /// Surface width in pixels, as a float.
    fn width(&self) -> f64 {
        f64::from(self.size().width)
    }

    /// Surface height in pixels, as a float.
    fn height(&self) -> f64 {
        f64::from(self.size().height)
    }

    /// Draw `image` stretched into `dest` (pre-transform coordinates).
    fn draw_image(&mut self, image: &ImageResource, dest: Rect) -> PrismResult<()>;

    /// Push transform and composite mode.
    fn save(&mut self);

    /// Pop transform and composite mode.
    fn restore(&mut self);

    /// Set the composite mode for subsequent draws.
    fn set_composite(&mut self, mode: CompositeMode);

    /// Active composite mode.
    fn composite(&self) -> CompositeMode;

    /// Append a translation to the current transform.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Append a scale to the current transform.
    fn scale(&mut self, sx: f64, sy: f64);

    /// Append a rotation to the current transform.
    fn rotate(&mut self, radians: f64);

    /// Active transform.
    fn transform(&self) -> Affine;
}

/// Scoped `save`/`restore`: saves on creation, restores on drop (including early returns via `?`).
pub struct Saved<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: Surface + ?Sized> Saved<'a, S> {
    /// Save `surface` state until the guard is dropped.
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: Surface + ?Sized> Deref for Saved<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for Saved<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for Saved<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
