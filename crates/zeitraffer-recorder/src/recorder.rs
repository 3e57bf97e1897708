//! Fixed-interval recording loop.

use crossbeam_channel::{select, tick, Receiver};
use tracing::{debug, info, instrument, warn};

use zeitraffer_capture::FrameSource;

use crate::config::RecorderConfig;
use crate::sink::FrameSink;

/// Outcome of a recording run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordingSummary {
    /// Frames grabbed from the source.
    pub frames_grabbed: u64,

    /// Frames the sink accepted.
    pub frames_written: u64,

    /// Frames the sink failed to persist.
    pub write_failures: u64,

    /// Index the next frame would have received.
    pub next_index: u64,
}

/// Grabs one frame per interval and hands it to a sink.
pub struct Recorder {
    config: RecorderConfig,
}

impl Recorder {
    /// Create a recorder.
    pub fn new(config: RecorderConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Record until a stop message arrives, the stop channel disconnects,
    /// or the frame limit is reached (blocking).
    ///
    /// Runs on the calling thread, which must be the thread that created
    /// `source`. A stop request takes effect between ticks.
    #[instrument(name = "recorder_run", skip_all, fields(interval_ms = self.config.interval_ms))]
    pub fn run<S, K>(&self, source: &mut S, sink: &mut K, stop: &Receiver<()>) -> RecordingSummary
    where
        S: FrameSource + ?Sized,
        K: FrameSink + ?Sized,
    {
        let (width, height) = source.dimensions();
        info!(width, height, "Recording started");

        let ticker = tick(self.config.interval());
        let mut summary = RecordingSummary {
            next_index: self.config.first_index,
            ..Default::default()
        };

        loop {
            select! {
                recv(stop) -> msg => {
                    match msg {
                        Ok(()) => info!("Stop requested"),
                        Err(_) => info!("Stop channel disconnected, stopping"),
                    }
                    break;
                }
                recv(ticker) -> _ => {
                    let index = summary.next_index;
                    let image = source.grab();
                    summary.frames_grabbed += 1;

                    match sink.write_frame(image, index) {
                        Ok(()) => summary.frames_written += 1,
                        Err(e) => {
                            warn!(index, "Failed to write frame: {}", e);
                            summary.write_failures += 1;
                        }
                    }
                    summary.next_index += 1;

                    if self
                        .config
                        .frame_limit
                        .is_some_and(|limit| summary.frames_grabbed >= limit)
                    {
                        debug!(frames = summary.frames_grabbed, "Frame limit reached");
                        break;
                    }
                }
            }
        }

        info!(
            grabbed = summary.frames_grabbed,
            written = summary.frames_written,
            failed = summary.write_failures,
            "Recording stopped"
        );
        summary
    }
}
