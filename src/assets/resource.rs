use std::fmt;
use std::sync::Arc;

use crate::assets::store::PreparedImage;
use crate::foundation::error::{PrismError, PrismResult};

/// A resolved, drawable image handle.
///
/// Holds the decoded pixels together with a ready-to-use `vello_cpu` image paint so repeated draws
/// during a transition do not rebuild the pixmap.
#[derive(Clone)]
pub struct ImageResource {
    source: Arc<str>,
    image: PreparedImage,
    paint: vello_cpu::Image,
}

impl ImageResource {
    /// Build a drawable handle for a decoded image loaded from `source`.
    pub fn new(source: impl Into<Arc<str>>, image: PreparedImage) -> PrismResult<Self> {
        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        Ok(Self {
            source: source.into(),
            image,
            paint,
        })
    }

    /// Source identifier this image was resolved from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Intrinsic width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width
    }

    /// Intrinsic height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height
    }

    /// Decoded premultiplied pixels.
    pub fn image(&self) -> &PreparedImage {
        &self.image
    }

    pub(crate) fn paint(&self) -> &vello_cpu::Image {
        &self.paint
    }
}

impl fmt::Debug for ImageResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageResource")
            .field("source", &self.source)
            .field("width", &self.image.width)
            .field("height", &self.image.height)
            .finish_non_exhaustive()
    }
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> PrismResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PrismError::asset("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PrismError::asset("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(PrismError::asset("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}
