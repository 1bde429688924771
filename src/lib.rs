//! Prism slider: a layered slideshow engine rendered on the CPU.
//!
//! Each layer owns a raster surface and slides a strip of images across it with an eased
//! transition. Layers may draw through a mask image (flipped and rotated per layer), and the
//! layers composite bottom to top into one frame:
//!
//! - Describe the slideshow with a [`PrismConfig`] (or one [`EngineConfig`] per layer)
//! - Build a [`Prism`], `init` it and apply loads
//! - Navigate with [`Prism::go_to`] and drive frames with [`Prism::tick`], or stream a whole
//!   transition into a [`FrameSink`]
#![forbid(unsafe_code)]

/// Easing curves.
pub mod animation;
/// Image sources, decoding and asynchronous loading.
pub mod assets;
/// Frame sinks.
pub mod encode;
/// Single-layer slide engine.
pub mod engine;
pub mod foundation;
/// Layer orchestration.
pub mod prism;
/// Drawing surfaces and pixel compositing.
pub mod render;
/// Frame scheduling.
pub mod timing;

pub use crate::foundation::core::{Affine, Canvas, Point, Rect, Vec2};
pub use crate::foundation::error::{PrismError, PrismResult};

pub use crate::animation::ease::{Ease, Easing, EasingFn};
pub use crate::assets::loader::{
    ImmediateLoader, LoadEvent, ResourceKey, ResourceLoader, ThreadedLoader,
};
pub use crate::assets::provider::{FsImageProvider, ImageProvider, MemoryImageProvider};
pub use crate::assets::resource::ImageResource;
pub use crate::assets::store::PreparedImage;
pub use crate::encode::png::{PngSequenceSink, write_png};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::engine::config::{EngineConfig, FlipAxis, MaskDescriptor, MaskEffects};
pub use crate::engine::instance::{Engine, LoadFailure, TickStatus};
pub use crate::engine::slot::Slot;
pub use crate::engine::transition::{Direction, FramePlan, Phase, SNAP_THRESHOLD_MS, SlideState};
pub use crate::prism::config::PrismConfig;
pub use crate::prism::orchestrator::Prism;
pub use crate::render::frame::FrameRGBA;
pub use crate::render::pixmap::PixmapSurface;
pub use crate::render::recording::{DrawCall, RecordingSurface, SurfaceOp};
pub use crate::render::surface::{CompositeMode, Surface};
pub use crate::timing::scheduler::{FixedStepScheduler, FrameScheduler, RealtimeScheduler};
