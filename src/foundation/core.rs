use crate::foundation::error::{PrismError, PrismResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Container (and surface) dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create validated dimensions; both sides must be non-zero.
    pub fn new(width: u32, height: u32) -> PrismResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    /// Reject zero-sized or oversized containers.
    pub fn validate(self) -> PrismResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PrismError::config(format!(
                "container size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        // vello_cpu pixmaps are addressed with u16 dimensions.
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(PrismError::config(format!(
                "container size too large: {}x{} (max {}x{})",
                self.width,
                self.height,
                u16::MAX,
                u16::MAX
            )));
        }
        Ok(())
    }

    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }

    /// Full-size rectangle anchored at the origin.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 960,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
