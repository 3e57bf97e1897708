//! Time-lapse recorder.
//!
//! Captures the whole virtual desktop once per interval and writes the
//! frames as a numbered PNG sequence until Ctrl-C is pressed.
//!
//! Usage: `zeitraffer [config.json]`

use std::process::ExitCode;
use std::thread;

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zeitraffer_recorder::{stop_channel, RecorderConfig};

/// Initialize logging.
fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "zeitraffer=info,zeitraffer_capture=info,zeitraffer_recorder=info".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_config() -> Result<RecorderConfig> {
    match std::env::args_os().nth(1) {
        Some(path) => RecorderConfig::from_json_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.to_string_lossy())),
        None => Ok(RecorderConfig::default()),
    }
}

/// Forward Ctrl-C to the stop channel from a dedicated thread.
fn spawn_signal_listener(stop_tx: Sender<()>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build signal runtime")?;

    thread::Builder::new()
        .name("signal-listener".to_string())
        .spawn(move || {
            match runtime.block_on(tokio::signal::ctrl_c()) {
                Ok(()) => info!("Interrupt received, finishing recording"),
                Err(e) => warn!("Signal listener failed, stopping: {}", e),
            }
            let _ = stop_tx.send(());
        })
        .context("Failed to spawn signal listener")?;

    Ok(())
}

#[cfg(windows)]
fn record(config: RecorderConfig, stop_rx: crossbeam_channel::Receiver<()>) -> Result<()> {
    use zeitraffer_capture::ScreenCapturer;
    use zeitraffer_recorder::{PngSequenceWriter, Recorder};

    // GDI handles are thread-affine: create, grab and dispose on this thread.
    let mut capturer = ScreenCapturer::new().context("Failed to create capturer")?;
    let mut sink = PngSequenceWriter::new(&config.output_dir)?;

    let summary = Recorder::new(config).run(&mut capturer, &mut sink, &stop_rx);
    capturer.dispose();

    info!(?summary, "Recorder finished");
    Ok(())
}

#[cfg(not(windows))]
fn record(_config: RecorderConfig, _stop_rx: crossbeam_channel::Receiver<()>) -> Result<()> {
    anyhow::bail!("GDI screen capture requires Windows")
}

fn run() -> Result<()> {
    let config = load_config()?;
    config.validate()?;
    info!(?config, "Starting zeitraffer");

    let (stop_tx, stop_rx) = stop_channel();
    spawn_signal_listener(stop_tx)?;

    record(config, stop_rx)
}

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
