//! Fixed-interval recording of captured frames.
//!
//! The [`Recorder`] grabs one frame per tick from a
//! [`zeitraffer_capture::FrameSource`] and hands it to a [`FrameSink`],
//! until a stop message arrives.

mod config;
mod error;
mod recorder;
mod sink;

pub use config::RecorderConfig;
pub use error::RecorderError;
pub use recorder::{Recorder, RecordingSummary};
pub use sink::{FrameSink, PngSequenceWriter};

use crossbeam_channel::{Receiver, Sender};

/// Result type for recorder operations.
pub type RecorderResult<T> = Result<T, RecorderError>;

/// Channel capacity for stop requests.
pub const STOP_CHANNEL_CAPACITY: usize = 1;

/// Creates a bounded stop channel for [`Recorder::run`].
pub fn stop_channel() -> (Sender<()>, Receiver<()>) {
    crossbeam_channel::bounded(STOP_CHANNEL_CAPACITY)
}
