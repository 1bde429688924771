use crate::assets::resource::ImageResource;
use crate::foundation::core::{Affine, Canvas, Rect};
use crate::foundation::error::PrismResult;
use crate::render::surface::{CompositeMode, StateStack, Surface};

/// One call made against a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// `save()`.
    Save,
    /// `restore()`.
    Restore,
    /// `set_composite(mode)`.
    SetComposite(CompositeMode),
    /// `translate(dx, dy)`.
    Translate(f64, f64),
    /// `scale(sx, sy)`.
    Scale(f64, f64),
    /// `rotate(radians)`.
    Rotate(f64),
    /// `draw_image(..)` with the state that was active at the time.
    Draw(DrawCall),
}

/// A recorded `draw_image` call.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    /// Source identifier of the drawn image.
    pub source: String,
    /// Destination rectangle before the transform.
    pub dest: Rect,
    /// Transform active during the draw.
    pub transform: Affine,
    /// Composite mode active during the draw.
    pub composite: CompositeMode,
}

/// Surface that records calls instead of rasterizing. Useful for tests and debugging.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    size: Canvas,
    state: StateStack,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    /// Every call recorded so far, in order.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Take the recorded calls, leaving the log empty.
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Only the recorded draws, in order.
    pub fn draws(&self) -> impl Iterator<Item = &DrawCall> {
        self.ops.iter().filter_map(|op| match op {
            SurfaceOp::Draw(d) => Some(d),
            _ => None,
        })
    }

    /// Number of saves not yet matched by a restore.
    pub fn save_depth(&self) -> usize {
        self.state.depth()
    }
}

impl Surface for RecordingSurface {
    fn create(size: Canvas) -> PrismResult<Self> {
        size.validate()?;
        Ok(Self {
            size,
            state: StateStack::default(),
            ops: Vec::new(),
        })
    }

    fn size(&self) -> Canvas {
        self.size
    }

    fn draw_image(&mut self, image: &ImageResource, dest: Rect) -> PrismResult<()> {
        let state = self.state.current();
        self.ops.push(SurfaceOp::Draw(DrawCall {
            source: image.source().to_string(),
            dest,
            transform: state.transform,
            composite: state.composite,
        }));
        Ok(())
    }

    fn save(&mut self) {
        self.state.save();
        self.ops.push(SurfaceOp::Save);
    }

    fn restore(&mut self) {
        self.state.restore();
        self.ops.push(SurfaceOp::Restore);
    }

    fn set_composite(&mut self, mode: CompositeMode) {
        self.state.set_composite(mode);
        self.ops.push(SurfaceOp::SetComposite(mode));
    }

    fn composite(&self) -> CompositeMode {
        self.state.current().composite
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.translate(dx, dy);
        self.ops.push(SurfaceOp::Translate(dx, dy));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.scale(sx, sy);
        self.ops.push(SurfaceOp::Scale(sx, sy));
    }

    fn rotate(&mut self, radians: f64) {
        self.state.rotate(radians);
        self.ops.push(SurfaceOp::Rotate(radians));
    }

    fn transform(&self) -> Affine {
        self.state.current().transform
    }
}
