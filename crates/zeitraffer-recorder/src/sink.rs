//! Frame sinks.

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use tracing::{debug, instrument};

use crate::error::RecorderError;
use crate::RecorderResult;

/// Destination for captured frames.
pub trait FrameSink {
    /// Persist one frame under the given sequence number.
    fn write_frame(&mut self, image: &RgbaImage, index: u64) -> RecorderResult<()>;
}

/// Writes each frame as `NNNNN.png` into a directory.
#[derive(Debug, Clone)]
pub struct PngSequenceWriter {
    dir: PathBuf,
}

impl PngSequenceWriter {
    /// Create the writer, creating `dir` if needed.
    #[instrument(name = "png_writer_new", skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn new(dir: impl AsRef<Path>) -> RecorderResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|source| RecorderError::Io {
            path: dir.clone(),
            source,
        })?;

        debug!("PNG sequence writer ready");
        Ok(Self { dir })
    }

    /// Path a frame with the given index is written to.
    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("{:05}.png", index))
    }
}

impl FrameSink for PngSequenceWriter {
    fn write_frame(&mut self, image: &RgbaImage, index: u64) -> RecorderResult<()> {
        let path = self.frame_path(index);
        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|source| RecorderError::Image {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), "Wrote frame");
        Ok(())
    }
}
