use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::error::{PrismError, PrismResult};
use crate::render::composite::flatten_premul_over_bg_to_opaque_rgba8;
use crate::render::frame::FrameRGBA;

/// Flatten `frame` over `background` and write it as an opaque PNG.
pub fn write_png(frame: &FrameRGBA, path: &Path, background: [u8; 4]) -> PrismResult<()> {
    let expected = (frame.width as usize) * (frame.height as usize) * 4;
    if frame.data.len() != expected {
        return Err(PrismError::render(format!(
            "frame buffer has {} bytes, expected {expected}",
            frame.data.len()
        )));
    }

    let mut opaque = vec![0u8; frame.data.len()];
    if frame.premultiplied {
        flatten_premul_over_bg_to_opaque_rgba8(&mut opaque, &frame.data, background)?;
    } else {
        opaque.copy_from_slice(&frame.data);
    }

    let img = image::RgbaImage::from_raw(frame.width, frame.height, opaque)
        .ok_or_else(|| PrismError::render("invalid rgba buffer size"))?;
    img.save(path)
        .with_context(|| format!("failed to write png '{}'", path.display()))?;
    Ok(())
}

/// Writes each frame to `<dir>/frame_00000.png`, `frame_00001.png`, …
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    background: [u8; 4],
    cfg: Option<SinkConfig>,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    /// Sink writing into `dir` (created on `begin`), flattening over `background`.
    pub fn new(dir: impl Into<PathBuf>, background: [u8; 4]) -> Self {
        Self {
            dir: dir.into(),
            background,
            cfg: None,
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written since the last `begin`, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// File name used for frame `idx`.
    pub fn frame_path(&self, idx: u64) -> PathBuf {
        self.dir.join(format!("frame_{idx:05}.png"))
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> PrismResult<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> PrismResult<()> {
        let Some(cfg) = self.cfg else {
            return Err(PrismError::state("push_frame called before begin"));
        };
        if (frame.width, frame.height) != (cfg.width, cfg.height) {
            return Err(PrismError::render(format!(
                "frame is {}x{}, sink expects {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        let path = self.frame_path(idx);
        write_png(frame, &path, self.background)?;
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> PrismResult<()> {
        self.cfg = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
