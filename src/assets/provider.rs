use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::assets::decode::decode_source;
use crate::assets::store::{PreparedImage, normalize_rel_path};
use crate::foundation::core::Canvas;
use crate::foundation::error::{PrismError, PrismResult};

/// Resolves a source identifier into decoded pixels.
///
/// Providers are called from loader worker threads, hence `Send + Sync`.
pub trait ImageProvider: Send + Sync {
    /// Load and decode `source`.
    fn load(&self, source: &str) -> PrismResult<PreparedImage>;
}

impl<P: ImageProvider + ?Sized> ImageProvider for Arc<P> {
    fn load(&self, source: &str) -> PrismResult<PreparedImage> {
        (**self).load(source)
    }
}

/// Loads images from files below an assets root.
///
/// Raster formats go through `image`; `.svg` sources are rasterized with `resvg`, stretched to
/// `svg_size` when set (masks are drawn at container size, so rasterizing at that size avoids
/// resampling).
#[derive(Clone, Debug)]
pub struct FsImageProvider {
    root: PathBuf,
    svg_size: Option<Canvas>,
}

impl FsImageProvider {
    /// Create a provider resolving sources relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            svg_size: None,
        }
    }

    /// Rasterize SVG sources at `size` instead of their intrinsic size.
    pub fn with_svg_size(mut self, size: Canvas) -> Self {
        self.svg_size = Some(size);
        self
    }

    /// Assets root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a relative source identifier to a path below the assets root.
    pub fn resolve(&self, source: &str) -> PrismResult<PathBuf> {
        let norm = normalize_rel_path(source)?;
        Ok(self.root.join(Path::new(&norm)))
    }
}

impl ImageProvider for FsImageProvider {
    fn load(&self, source: &str) -> PrismResult<PreparedImage> {
        let path = self.resolve(source)?;
        let bytes = std::fs::read(&path)
            .with_context(|| format!("failed to read image '{}'", path.display()))?;
        decode_source(source, &bytes, self.svg_size)
            .map_err(|e| PrismError::asset(format!("failed to decode '{source}': {e}")))
    }
}

/// Serves pre-decoded images from memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryImageProvider {
    images: HashMap<String, PreparedImage>,
}

impl MemoryImageProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `image` under `source`, replacing any previous entry.
    pub fn insert(&mut self, source: impl Into<String>, image: PreparedImage) {
        self.images.insert(source.into(), image);
    }

    /// Builder-style [`MemoryImageProvider::insert`].
    pub fn with(mut self, source: impl Into<String>, image: PreparedImage) -> Self {
        self.insert(source, image);
        self
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Return `true` when no sources are registered.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageProvider for MemoryImageProvider {
    fn load(&self, source: &str) -> PrismResult<PreparedImage> {
        self.images
            .get(source)
            .cloned()
            .ok_or_else(|| PrismError::asset(format!("unknown image source '{source}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/provider.rs"]
mod tests;
