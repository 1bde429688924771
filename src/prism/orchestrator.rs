use tracing::debug;

use crate::assets::loader::ResourceLoader;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::engine::instance::{Engine, LoadFailure, TickStatus};
use crate::foundation::core::Canvas;
use crate::foundation::error::{PrismError, PrismResult};
use crate::prism::config::PrismConfig;
use crate::render::composite::composite_in_place;
use crate::render::frame::FrameRGBA;
use crate::render::pixmap::PixmapSurface;
use crate::render::surface::{CompositeMode, Surface};
use crate::timing::scheduler::FrameScheduler;

/// Stack of engine layers sharing slides and timing, driven as one slideshow.
///
/// Layers are ordered bottom to top. Navigation is broadcast to every layer; the bottom layer
/// decides whether a navigation is accepted.
pub struct Prism<S: Surface = PixmapSurface> {
    container: Canvas,
    layers: Vec<Engine<S>>,
}

impl<S: Surface> Prism<S> {
    /// Group existing engines. They must agree on container size and slide count.
    pub fn new(layers: Vec<Engine<S>>) -> PrismResult<Self> {
        let Some(first) = layers.first() else {
            return Err(PrismError::config("a prism needs at least one layer"));
        };
        let container = first.config().container;
        let slides = first.slide_count();
        if let Some(i) = layers
            .iter()
            .position(|l| l.config().container != container || l.slide_count() != slides)
        {
            return Err(PrismError::config(format!(
                "layer {i} disagrees with layer 0 on container size or slide count"
            )));
        }
        Ok(Self { container, layers })
    }

    /// Build one engine per configured layer, each with its own loader.
    pub fn from_config(
        config: &PrismConfig,
        mut loader: impl FnMut() -> Box<dyn ResourceLoader>,
    ) -> PrismResult<Self> {
        let layers = config
            .layers()?
            .into_iter()
            .map(|c| Engine::new(c, loader()))
            .collect::<PrismResult<Vec<_>>>()?;
        Self::new(layers)
    }

    /// Initialize every layer.
    pub fn init(&mut self) -> PrismResult<()> {
        for layer in &mut self.layers {
            layer.init()?;
        }
        Ok(())
    }

    /// Apply completed loads on every layer without blocking.
    pub fn pump_loads(&mut self) -> PrismResult<Vec<LoadFailure>> {
        let mut failures = Vec::new();
        for layer in &mut self.layers {
            failures.extend(layer.pump_loads()?);
        }
        Ok(failures)
    }

    /// Block until every layer has applied all of its loads.
    pub fn wait_for_loads(&mut self) -> PrismResult<Vec<LoadFailure>> {
        let mut failures = Vec::new();
        for layer in &mut self.layers {
            failures.extend(layer.wait_for_loads()?);
        }
        Ok(failures)
    }

    /// Broadcast a navigation to `index` at `now_ms`.
    ///
    /// Ignored while the bottom layer is animating. Returns whether any layer started a
    /// transition.
    pub fn go_to(&mut self, index: usize, now_ms: f64) -> bool {
        if self.layers[0].is_animating() {
            debug!(index, "navigation ignored while animating");
            return false;
        }
        let mut accepted = false;
        for layer in &mut self.layers {
            accepted |= layer.go_to(index, now_ms);
        }
        accepted
    }

    /// Broadcast a jump to `index` (settled frame only).
    pub fn jump_to(&mut self, index: usize) -> PrismResult<bool> {
        if self.layers[0].is_animating() {
            return Ok(false);
        }
        let mut accepted = false;
        for layer in &mut self.layers {
            accepted |= layer.jump_to(index)?;
        }
        Ok(accepted)
    }

    /// Tick every layer. `Animating` while any layer still animates.
    pub fn tick(&mut self, now_ms: f64) -> PrismResult<TickStatus> {
        let mut status = TickStatus::Idle;
        for layer in &mut self.layers {
            status = match (status, layer.tick(now_ms)?) {
                (TickStatus::Animating, _) | (_, TickStatus::Animating) => TickStatus::Animating,
                (TickStatus::Finished, _) | (_, TickStatus::Finished) => TickStatus::Finished,
                _ => TickStatus::Idle,
            };
        }
        Ok(status)
    }

    /// Drive the running transition on every layer to completion. Returns the frames ticked.
    pub fn run_transition(&mut self, scheduler: &mut dyn FrameScheduler) -> PrismResult<u64> {
        let mut frames = 0;
        while self.is_animating() {
            let now = scheduler.next_frame();
            self.pump_loads()?;
            self.tick(now)?;
            frames += 1;
        }
        Ok(frames)
    }

    pub fn is_animating(&self) -> bool {
        self.layers.iter().any(Engine::is_animating)
    }

    /// Current slide of the bottom layer.
    pub fn current_index(&self) -> usize {
        self.layers[0].current_index()
    }

    pub fn slide_count(&self) -> usize {
        self.layers[0].slide_count()
    }

    pub fn container(&self) -> Canvas {
        self.container
    }

    pub fn is_ready(&self) -> bool {
        self.layers.iter().all(Engine::is_ready)
    }

    /// Layers, bottom to top.
    pub fn layers(&self) -> &[Engine<S>] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Engine<S>] {
        &mut self.layers
    }
}

impl Prism<PixmapSurface> {
    /// Composite every layer, bottom to top, into one premultiplied frame.
    pub fn compose_frame(&self) -> PrismResult<FrameRGBA> {
        let mut data = vec![0u8; self.container.rgba8_len()];
        for (i, layer) in self.layers.iter().enumerate() {
            let surface = layer
                .surface()
                .ok_or_else(|| PrismError::state(format!("layer {i} is not initialized")))?;
            composite_in_place(&mut data, surface.pixels(), CompositeMode::SourceOver)?;
        }
        Ok(FrameRGBA {
            width: self.container.width,
            height: self.container.height,
            data,
            premultiplied: true,
        })
    }

    /// Navigate to `index` and push one composed frame per tick into `sink` until the transition
    /// settles. Returns the number of frames pushed.
    #[tracing::instrument(skip(self, scheduler, sink))]
    pub fn render_transition(
        &mut self,
        index: usize,
        fps: f64,
        scheduler: &mut dyn FrameScheduler,
        sink: &mut dyn FrameSink,
    ) -> PrismResult<u64> {
        if !self.go_to(index, scheduler.now()) {
            return Err(PrismError::state(format!(
                "transition from {} to {index} was not accepted",
                self.current_index()
            )));
        }
        sink.begin(SinkConfig {
            width: self.container.width,
            height: self.container.height,
            fps,
        })?;

        let mut idx = 0u64;
        while self.is_animating() {
            let now = scheduler.next_frame();
            self.pump_loads()?;
            self.tick(now)?;
            sink.push_frame(idx, &self.compose_frame()?)?;
            idx += 1;
        }
        sink.end()?;
        debug!(frames = idx, "transition rendered");
        Ok(idx)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/prism/orchestrator.rs"]
mod tests;
