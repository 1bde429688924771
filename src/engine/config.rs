use std::fmt;
use std::time::Duration;

use crate::animation::ease::{Ease, EasingFn};
use crate::foundation::core::Canvas;
use crate::foundation::error::{PrismError, PrismResult};

/// Axis a masked slide is mirrored across.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FlipAxis {
    /// Mirror horizontally: `translate(w, 0)`, `scale(-1, 1)`.
    #[serde(rename = "X", alias = "x", alias = "horizontal")]
    Horizontal,
    /// Mirror vertically: `translate(0, h)`, `scale(1, -1)`.
    #[serde(rename = "Y", alias = "y", alias = "vertical")]
    Vertical,
}

/// Geometric effects applied to slides drawn through a mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MaskEffects {
    /// Optional mirror, applied before rotation. `false` and `null` both mean none.
    #[serde(default, deserialize_with = "flip_or_false")]
    pub flip: Option<FlipAxis>,
    /// Clockwise rotation about the surface center, in degrees. `0` disables it.
    pub rotate: f64,
}

fn flip_or_false<'de, D>(de: D) -> Result<Option<FlipAxis>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize as _;
    use serde::de::Error as _;

    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Flip {
        Switch(bool),
        Axis(FlipAxis),
    }

    match Option::<Flip>::deserialize(de)? {
        None | Some(Flip::Switch(false)) => Ok(None),
        Some(Flip::Switch(true)) => Err(D::Error::custom(
            "flip: true does not name an axis, use \"X\" or \"Y\"",
        )),
        Some(Flip::Axis(axis)) => Ok(Some(axis)),
    }
}

impl MaskEffects {
    /// Reject negative or non-finite rotations.
    pub fn validate(&self) -> PrismResult<()> {
        if !self.rotate.is_finite() || self.rotate < 0.0 {
            return Err(PrismError::config(format!(
                "mask rotate must be finite and >= 0, got {}",
                self.rotate
            )));
        }
        Ok(())
    }
}

/// A mask image and the effects used when drawing slides through it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaskDescriptor {
    /// Source identifier of the mask image.
    pub source: String,
    /// Effects applied to masked slide draws.
    #[serde(default)]
    pub effects: MaskEffects,
}

impl MaskDescriptor {
    /// Mask without effects.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            effects: MaskEffects::default(),
        }
    }

    /// Builder-style flip.
    pub fn with_flip(mut self, axis: FlipAxis) -> Self {
        self.effects.flip = Some(axis);
        self
    }

    /// Builder-style rotation in degrees.
    pub fn with_rotate(mut self, degrees: f64) -> Self {
        self.effects.rotate = degrees;
        self
    }

    fn validate(&self) -> PrismResult<()> {
        if self.source.trim().is_empty() {
            return Err(PrismError::config("mask source must be non-empty"));
        }
        self.effects.validate()
    }
}

/// Everything one engine layer needs. Immutable once the engine is built.
#[derive(Clone)]
pub struct EngineConfig {
    /// Container (and surface) size.
    pub container: Canvas,
    /// Ordered slide source identifiers.
    pub slides: Vec<String>,
    /// Optional mask; `None` draws slides directly.
    pub mask: Option<MaskDescriptor>,
    /// Time one transition takes, whatever the number of slides it spans.
    pub duration: Duration,
    /// Easing strategy applied to normalized remaining time.
    pub easing: EasingFn,
}

impl EngineConfig {
    /// Unmasked config with the default easing.
    pub fn new(container: Canvas, slides: Vec<String>, duration: Duration) -> Self {
        Self {
            container,
            slides,
            mask: None,
            duration,
            easing: Ease::default().into_fn(),
        }
    }

    /// Builder-style mask.
    pub fn with_mask(mut self, mask: MaskDescriptor) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Builder-style easing strategy.
    pub fn with_easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Duration in milliseconds, the time unit used by the transition state machine.
    pub fn duration_ms(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }

    /// Fail fast on configurations the engine cannot run.
    pub fn validate(&self) -> PrismResult<()> {
        self.container.validate()?;
        if self.slides.is_empty() {
            return Err(PrismError::config("at least one slide is required"));
        }
        if let Some(i) = self.slides.iter().position(|s| s.trim().is_empty()) {
            return Err(PrismError::config(format!(
                "slide {i} has an empty source identifier"
            )));
        }
        if self.duration.is_zero() {
            return Err(PrismError::config("transition duration must be > 0"));
        }
        if let Some(mask) = &self.mask {
            mask.validate()?;
        }
        Ok(())
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("container", &self.container)
            .field("slides", &self.slides)
            .field("mask", &self.mask)
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/config.rs"]
mod tests;
