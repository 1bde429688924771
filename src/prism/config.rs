use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::animation::ease::Ease;
use crate::engine::config::{EngineConfig, FlipAxis, MaskDescriptor};
use crate::foundation::core::Canvas;
use crate::foundation::error::{PrismError, PrismResult};

fn default_duration_ms() -> f64 {
    1300.0
}

fn default_base_layer() -> bool {
    true
}

/// A layered slideshow: shared slides and timing, one masked layer per mask, and an optional
/// unmasked base layer underneath.
///
/// JSON shape:
///
/// ```json
/// {
///   "container": { "width": 1200, "height": 960 },
///   "slides": ["img/bird-a.jpg", "img/bird-b.jpg"],
///   "masks": [{ "source": "img/masks/prism-a.svg", "effects": { "flip": "X", "rotate": 45 } }],
///   "duration_ms": 1300,
///   "easing": "InOutQuint",
///   "base_layer": true
/// }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrismConfig {
    #[serde(default)]
    pub container: Canvas,
    pub slides: Vec<String>,
    #[serde(default)]
    pub masks: Vec<MaskDescriptor>,
    #[serde(default = "default_duration_ms")]
    pub duration_ms: f64,
    #[serde(default)]
    pub easing: Ease,
    /// Draw an unmasked layer below the masked ones.
    #[serde(default = "default_base_layer")]
    pub base_layer: bool,
}

impl PrismConfig {
    /// Parse a config from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> PrismResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| PrismError::serde(format!("parse prism config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PrismResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PrismError::config(format!("open prism config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Four birds under three prisms, at 1200x960.
    pub fn demo() -> Self {
        Self {
            container: Canvas::default(),
            slides: ["a", "b", "c", "d"]
                .iter()
                .map(|k| format!("img/bird-{k}.jpg"))
                .collect(),
            masks: vec![
                MaskDescriptor::new("img/masks/prism-a.svg")
                    .with_flip(FlipAxis::Horizontal)
                    .with_rotate(45.0),
                MaskDescriptor::new("img/masks/prism-b.svg").with_rotate(45.0),
                MaskDescriptor::new("img/masks/prism-c.svg").with_rotate(180.0),
            ],
            duration_ms: default_duration_ms(),
            easing: Ease::InOutQuint,
            base_layer: true,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_ms / 1000.0)
    }

    /// Number of layers this config produces.
    pub fn layer_count(&self) -> usize {
        usize::from(self.base_layer) + self.masks.len()
    }

    /// Check the whole config, including every layer it expands to.
    pub fn validate(&self) -> PrismResult<()> {
        if !self.duration_ms.is_finite() || self.duration_ms <= 0.0 {
            return Err(PrismError::config(format!(
                "duration_ms must be finite and > 0, got {}",
                self.duration_ms
            )));
        }
        if self.layer_count() == 0 {
            return Err(PrismError::config(
                "no layers: enable base_layer or configure at least one mask",
            ));
        }
        for layer in self.build_layers() {
            layer.validate()?;
        }
        Ok(())
    }

    /// Validated per-layer engine configs, bottom to top.
    pub fn layers(&self) -> PrismResult<Vec<EngineConfig>> {
        self.validate()?;
        Ok(self.build_layers())
    }

    fn build_layers(&self) -> Vec<EngineConfig> {
        let base = EngineConfig::new(self.container, self.slides.clone(), self.duration())
            .with_easing(self.easing.into_fn());
        let masked = self
            .masks
            .iter()
            .map(|m| base.clone().with_mask(m.clone()));
        self.base_layer
            .then(|| base.clone())
            .into_iter()
            .chain(masked)
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/prism/config.rs"]
mod tests;
