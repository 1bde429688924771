use tracing::{debug, trace, warn};

use crate::assets::loader::{LoadEvent, ResourceKey, ResourceLoader};
use crate::assets::resource::ImageResource;
use crate::engine::config::EngineConfig;
use crate::engine::mask::render_mask;
use crate::engine::slide::render_slide;
use crate::engine::slot::Slot;
use crate::engine::transition::SlideState;
use crate::foundation::error::{PrismError, PrismResult};
use crate::render::pixmap::PixmapSurface;
use crate::render::surface::Surface;
use crate::timing::scheduler::FrameScheduler;

/// Outcome of one [`Engine::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStatus {
    /// No transition was running; nothing drawn.
    Idle,
    /// A frame was drawn and the transition continues.
    Animating,
    /// The snap frame was drawn; the engine is idle again.
    Finished,
}

/// A load that completed with an error. The slot stays pending.
#[derive(Debug)]
pub struct LoadFailure {
    pub key: ResourceKey,
    pub source: String,
    pub error: PrismError,
}

/// One visual layer: a surface, its slide and mask slots, and the transition state machine.
///
/// Engines are driven from a single thread. Loads complete asynchronously through the
/// [`ResourceLoader`] and are applied when the owner calls [`Engine::pump_loads`] (also done on
/// every frame of [`Engine::run_transition`]).
pub struct Engine<S: Surface = PixmapSurface> {
    config: EngineConfig,
    loader: Box<dyn ResourceLoader>,
    surface: Option<S>,
    slots: Vec<Slot>,
    mask: Option<Slot>,
    state: SlideState,
}

impl<S: Surface> Engine<S> {
    /// Validate `config` and build an uninitialized engine. No surface exists and nothing is
    /// requested until [`Engine::init`].
    pub fn new(config: EngineConfig, loader: Box<dyn ResourceLoader>) -> PrismResult<Self> {
        config.validate()?;
        let slots = config.slides.iter().cloned().map(Slot::Pending).collect();
        let mask = config.mask.as_ref().map(|m| Slot::Pending(m.source.clone()));
        Ok(Self {
            config,
            loader,
            surface: None,
            slots,
            mask,
            state: SlideState::default(),
        })
    }

    /// Create the surface and request the mask (if any) and every slide, in index order.
    #[tracing::instrument(
        skip(self),
        fields(slides = self.slots.len(), masked = self.mask.is_some())
    )]
    pub fn init(&mut self) -> PrismResult<()> {
        if self.surface.is_some() {
            return Err(PrismError::state("engine already initialized"));
        }
        self.surface = Some(S::create(self.config.container)?);

        if let Some(mask) = &self.mask {
            self.loader.request(ResourceKey::Mask, mask.source());
        }
        for (i, slot) in self.slots.iter().enumerate() {
            self.loader.request(ResourceKey::Slide(i), slot.source());
        }
        debug!(outstanding = self.loader.outstanding(), "loads requested");
        Ok(())
    }

    /// Apply every load completed so far, without blocking.
    pub fn pump_loads(&mut self) -> PrismResult<Vec<LoadFailure>> {
        let events = self.loader.poll();
        self.apply_loads(events)
    }

    /// Block until every requested load has completed, applying each.
    pub fn wait_for_loads(&mut self) -> PrismResult<Vec<LoadFailure>> {
        let mut failures = self.pump_loads()?;
        while self.loader.outstanding() > 0 {
            let events = self.loader.wait();
            failures.extend(self.apply_loads(events)?);
        }
        Ok(failures)
    }

    fn apply_loads(&mut self, events: Vec<LoadEvent>) -> PrismResult<Vec<LoadFailure>> {
        let mut failures = Vec::new();
        for LoadEvent {
            key,
            source,
            result,
        } in events
        {
            let resource = match result.and_then(|img| ImageResource::new(source.as_str(), img)) {
                Ok(r) => r,
                Err(error) => {
                    warn!(?key, source = %source, %error, "image load failed");
                    failures.push(LoadFailure { key, source, error });
                    continue;
                }
            };
            match key {
                ResourceKey::Mask => {
                    if self.mask.is_none() {
                        trace!(source = %source, "mask completion without a configured mask");
                        continue;
                    }
                    self.mask = Some(Slot::Ready(resource));
                    self.on_mask_ready()?;
                }
                ResourceKey::Slide(i) => {
                    let Some(slot) = self.slots.get_mut(i) else {
                        trace!(index = i, "completion for unknown slide slot");
                        continue;
                    };
                    *slot = Slot::Ready(resource);
                    // First frame only: the layer must still rest at home.
                    if i == 0 && !self.state.is_animating() && self.state.current == 0 {
                        self.render_index(0, Some(0.0))?;
                    }
                }
            }
        }
        Ok(failures)
    }

    fn on_mask_ready(&mut self) -> PrismResult<()> {
        let (Some(surface), Some(Slot::Ready(mask))) = (self.surface.as_mut(), self.mask.as_ref())
        else {
            return Ok(());
        };
        render_mask(surface, mask, self.config.container)?;
        debug!(source = mask.source(), "mask rendered");

        let current = self.state.current;
        if !self.state.is_animating() && self.slots[current].is_ready() {
            self.render_index(current, Some(current as f64))?;
        }
        Ok(())
    }

    /// Start a transition to `index` at `now_ms`.
    ///
    /// Returns `false` without changing anything when `index` is the current slide, out of
    /// range, a transition is already running, or the engine is not initialized.
    pub fn go_to(&mut self, index: usize, now_ms: f64) -> bool {
        if self.surface.is_none() {
            trace!(index, "go_to before init ignored");
            return false;
        }
        let duration_ms = self.config.duration_ms();
        match self.state.begin(index, self.slots.len(), now_ms, duration_ms) {
            Some(next) => {
                debug!(
                    from = next.previous,
                    to = next.current,
                    offset = next.offset,
                    "transition started"
                );
                self.state = next;
                true
            }
            None => {
                trace!(index, current = self.state.current, "go_to ignored");
                false
            }
        }
    }

    /// Move straight to `index`: the transition is accepted like [`Engine::go_to`] and
    /// immediately ticked at its end time, so only the settled frame is drawn.
    pub fn jump_to(&mut self, index: usize) -> PrismResult<bool> {
        if !self.go_to(index, 0.0) {
            return Ok(false);
        }
        self.tick(self.config.duration_ms())?;
        Ok(true)
    }

    /// Draw the frame at `now_ms` if a transition is running.
    pub fn tick(&mut self, now_ms: f64) -> PrismResult<TickStatus> {
        let Some(plan) = self
            .state
            .plan(now_ms, self.config.duration_ms(), &*self.config.easing)
        else {
            return Ok(TickStatus::Idle);
        };

        for &i in &plan.indices {
            self.render_index(i, Some(plan.progress))?;
        }
        if !plan.snap {
            return Ok(TickStatus::Animating);
        }

        self.state = self.state.settle();
        let current = self.state.current;
        self.render_index(current, Some(current as f64))?;
        debug!(current, "transition finished");
        Ok(TickStatus::Finished)
    }

    /// Drive the running transition to completion, one scheduler frame per tick.
    ///
    /// Loads are pumped before each tick. Returns the number of frames drawn; `0` when idle.
    pub fn run_transition(&mut self, scheduler: &mut dyn FrameScheduler) -> PrismResult<u64> {
        let mut frames = 0;
        while self.state.is_animating() {
            let now = scheduler.next_frame();
            self.pump_loads()?;
            if self.tick(now)? != TickStatus::Idle {
                frames += 1;
            }
        }
        Ok(frames)
    }

    fn render_index(&mut self, index: usize, progress: Option<f64>) -> PrismResult<()> {
        let Some(surface) = self.surface.as_mut() else {
            return Err(PrismError::state("engine not initialized"));
        };
        match self.slots.get(index) {
            Some(Slot::Ready(slide)) => render_slide(
                surface,
                slide,
                index,
                progress,
                self.config.mask.as_ref().map(|m| &m.effects),
            ),
            _ => {
                trace!(index, "slide not ready, draw skipped");
                Ok(())
            }
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Snapshot of the navigation state.
    pub fn state(&self) -> SlideState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        self.state.is_animating()
    }

    pub fn current_index(&self) -> usize {
        self.state.current
    }

    pub fn slide_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Mask slot; `None` for an unmasked layer.
    pub fn mask_slot(&self) -> Option<&Slot> {
        self.mask.as_ref()
    }

    /// True once the mask (if any) and every slide are loaded.
    pub fn is_ready(&self) -> bool {
        self.mask.as_ref().is_none_or(Slot::is_ready) && self.slots.iter().all(Slot::is_ready)
    }

    pub fn is_initialized(&self) -> bool {
        self.surface.is_some()
    }

    /// Drawing surface; `None` before [`Engine::init`].
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/instance.rs"]
mod tests;
