use std::collections::VecDeque;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

use crate::assets::provider::ImageProvider;
use crate::assets::store::PreparedImage;
use crate::foundation::error::{PrismError, PrismResult};

/// Which slot of an engine a load belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    /// The layer's mask image.
    Mask,
    /// A slide slot, by index.
    Slide(usize),
}

/// Completion of one load request. Delivered exactly once per request.
#[derive(Debug)]
pub struct LoadEvent {
    /// Slot the request was issued for.
    pub key: ResourceKey,
    /// Source identifier that was requested.
    pub source: String,
    /// Decoded image, or why it could not be produced.
    pub result: PrismResult<PreparedImage>,
}

/// Asynchronous image loading capability consumed by engines.
///
/// `request` never blocks and never reports completion inline; completions surface through
/// `poll`/`wait`, in whatever order they finish.
pub trait ResourceLoader {
    /// Start loading `source` for `key`.
    fn request(&mut self, key: ResourceKey, source: &str);

    /// Drain completions observed since the last call, without blocking.
    fn poll(&mut self) -> Vec<LoadEvent>;

    /// Block until at least one outstanding request completes, then drain.
    ///
    /// Returns immediately (possibly empty) when nothing is outstanding.
    fn wait(&mut self) -> Vec<LoadEvent>;

    /// Number of requests whose completion has not been drained yet.
    fn outstanding(&self) -> usize;
}

/// Decodes each request on its own worker thread and reports back over a channel.
pub struct ThreadedLoader {
    provider: Arc<dyn ImageProvider>,
    tx: Sender<LoadEvent>,
    rx: Receiver<LoadEvent>,
    failed_to_spawn: VecDeque<LoadEvent>,
    outstanding: usize,
}

impl ThreadedLoader {
    /// Create a loader backed by `provider`.
    pub fn new(provider: Arc<dyn ImageProvider>) -> Self {
        let (tx, rx) = channel();
        Self {
            provider,
            tx,
            rx,
            failed_to_spawn: VecDeque::new(),
            outstanding: 0,
        }
    }

    fn drain(&mut self, mut out: Vec<LoadEvent>) -> Vec<LoadEvent> {
        out.extend(self.failed_to_spawn.drain(..));
        while let Ok(ev) = self.rx.try_recv() {
            out.push(ev);
        }
        self.outstanding = self.outstanding.saturating_sub(out.len());
        out
    }
}

impl ResourceLoader for ThreadedLoader {
    fn request(&mut self, key: ResourceKey, source: &str) {
        self.outstanding += 1;
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let owned = source.to_string();
        let spawned = std::thread::Builder::new()
            .name(format!("prism-load-{key:?}"))
            .spawn(move || {
                // A panicking provider still owes the loader its completion.
                let result = catch_unwind(AssertUnwindSafe(|| provider.load(&owned)))
                    .unwrap_or_else(|_| {
                        Err(PrismError::asset(format!(
                            "image provider panicked while loading '{owned}'"
                        )))
                    });
                // The receiver only disappears when the loader is dropped; nobody is left to
                // observe the result in that case.
                let _ = tx.send(LoadEvent {
                    key,
                    source: owned,
                    result,
                });
            });
        if let Err(e) = spawned {
            self.failed_to_spawn.push_back(LoadEvent {
                key,
                source: source.to_string(),
                result: Err(PrismError::asset(format!(
                    "failed to spawn loader thread: {e}"
                ))),
            });
        }
    }

    fn poll(&mut self) -> Vec<LoadEvent> {
        self.drain(Vec::new())
    }

    fn wait(&mut self) -> Vec<LoadEvent> {
        if self.outstanding == 0 || !self.failed_to_spawn.is_empty() {
            return self.poll();
        }
        let mut out = Vec::new();
        if let Ok(ev) = self.rx.recv() {
            out.push(ev);
        }
        self.drain(out)
    }

    fn outstanding(&self) -> usize {
        self.outstanding
    }
}

/// Resolves requests synchronously on the next `poll`, in request order.
///
/// Deterministic; used for offline rendering and tests.
pub struct ImmediateLoader<P> {
    provider: P,
    queue: VecDeque<(ResourceKey, String)>,
}

impl<P: ImageProvider> ImmediateLoader<P> {
    /// Create a loader backed by `provider`.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            queue: VecDeque::new(),
        }
    }
}

impl<P: ImageProvider> ResourceLoader for ImmediateLoader<P> {
    fn request(&mut self, key: ResourceKey, source: &str) {
        self.queue.push_back((key, source.to_string()));
    }

    fn poll(&mut self) -> Vec<LoadEvent> {
        self.queue
            .drain(..)
            .map(|(key, source)| {
                let result = self.provider.load(&source);
                LoadEvent {
                    key,
                    source,
                    result,
                }
            })
            .collect()
    }

    fn wait(&mut self) -> Vec<LoadEvent> {
        self.poll()
    }

    fn outstanding(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
