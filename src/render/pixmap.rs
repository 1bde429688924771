use crate::assets::resource::ImageResource;
use crate::foundation::core::{Affine, Canvas, Rect};
use crate::foundation::error::{PrismError, PrismResult};
use crate::render::composite::composite_in_place;
use crate::render::frame::FrameRGBA;
use crate::render::surface::{CompositeMode, StateStack, Surface};

/// CPU raster surface holding premultiplied RGBA8 pixels.
///
/// Each `draw_image` rasterizes the transformed image into a scratch layer with `vello_cpu`, then
/// composites that layer onto the retained pixels with the active [`CompositeMode`]. Pixels persist
/// between draws, like a 2D canvas.
pub struct PixmapSurface {
    size: Canvas,
    pixels: Vec<u8>,
    scratch: vello_cpu::Pixmap,
    ctx: Option<vello_cpu::RenderContext>,
    state: StateStack,
}

impl PixmapSurface {
    /// Premultiplied RGBA8 pixels, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = ((y as usize) * (self.size.width as usize) + (x as usize)) * 4;
        let p = self.pixels.get(i..i + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Reset every pixel to transparent. Drawing state is untouched.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Copy the current pixels into a frame.
    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.size.width,
            height: self.size.height,
            data: self.pixels.clone(),
            premultiplied: true,
        }
    }

    fn dims_u16(size: Canvas) -> PrismResult<(u16, u16)> {
        let w: u16 = size
            .width
            .try_into()
            .map_err(|_| PrismError::render("surface width exceeds u16"))?;
        let h: u16 = size
            .height
            .try_into()
            .map_err(|_| PrismError::render("surface height exceeds u16"))?;
        Ok((w, h))
    }

    fn rasterize_layer(&mut self, image: &ImageResource, transform: Affine) -> PrismResult<()> {
        let (w, h) = Self::dims_u16(self.size)?;
        self.scratch.data_as_u8_slice_mut().fill(0);

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(image.paint().clone());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width()),
            f64::from(image.height()),
        ));
        ctx.flush();
        ctx.render_to_pixmap(&mut self.scratch);
        self.ctx = Some(ctx);
        Ok(())
    }
}

impl Surface for PixmapSurface {
    fn create(size: Canvas) -> PrismResult<Self> {
        size.validate()?;
        let (w, h) = Self::dims_u16(size)?;
        Ok(Self {
            size,
            pixels: vec![0u8; size.rgba8_len()],
            scratch: vello_cpu::Pixmap::new(w, h),
            ctx: None,
            state: StateStack::default(),
        })
    }

    fn size(&self) -> Canvas {
        self.size
    }

    fn draw_image(&mut self, image: &ImageResource, dest: Rect) -> PrismResult<()> {
        if dest.width() <= 0.0 || dest.height() <= 0.0 {
            return Ok(());
        }
        let state = self.state.current();
        let local = Affine::translate((dest.x0, dest.y0))
            * Affine::scale_non_uniform(
                dest.width() / f64::from(image.width()),
                dest.height() / f64::from(image.height()),
            );
        let transform = state.transform * local;

        // Off-surface draws cannot change anything unless the mode replaces the whole surface.
        let bbox = transform.transform_rect_bbox(Rect::new(
            0.0,
            0.0,
            f64::from(image.width()),
            f64::from(image.height()),
        ));
        if state.composite != CompositeMode::Copy
            && bbox.intersect(self.size.rect()).area() <= 0.0
        {
            return Ok(());
        }

        self.rasterize_layer(image, transform)?;
        composite_in_place(
            &mut self.pixels,
            self.scratch.data_as_u8_slice(),
            state.composite,
        )
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn set_composite(&mut self, mode: CompositeMode) {
        self.state.set_composite(mode);
    }

    fn composite(&self) -> CompositeMode {
        self.state.current().composite
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.translate(dx, dy);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.scale(sx, sy);
    }

    fn rotate(&mut self, radians: f64) {
        self.state.rotate(radians);
    }

    fn transform(&self) -> Affine {
        self.state.current().transform
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/pixmap.rs"]
mod tests;
