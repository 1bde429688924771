use crate::assets::resource::ImageResource;

/// One image a layer depends on: still loading, or decoded and drawable.
#[derive(Clone, Debug)]
pub enum Slot {
    /// Requested; holds the source identifier.
    Pending(String),
    /// Decoded and ready to draw.
    Ready(ImageResource),
}

impl Slot {
    /// Source identifier, whatever the state.
    pub fn source(&self) -> &str {
        match self {
            Self::Pending(s) => s,
            Self::Ready(r) => r.source(),
        }
    }

    /// Drawable resource, if loaded.
    pub fn ready(&self) -> Option<&ImageResource> {
        match self {
            Self::Pending(_) => None,
            Self::Ready(r) => Some(r),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}
