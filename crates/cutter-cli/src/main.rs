// crates/cutter-cli/src/main.rs
//
// Command-line front end over cutter_engine::render. Reads its cut list
// from a JSON file, logs through `tracing` the way miquels-hls-server's
// `main.rs` does, and reports progress to the terminal.

mod cutlist_file;
mod progress;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cutter_engine::RenderArgs;

/// Cuts a video down to the time ranges named in a cut-list file.
#[derive(Parser, Debug)]
#[command(name = "cutter", version, about)]
struct Cli {
    /// Input media file; must contain one video and one audio stream.
    input: PathBuf,

    /// Output path; container format is inferred from the extension.
    output: PathBuf,

    /// JSON file describing the ranges to keep, in centiseconds:
    /// `{"cuts": [{"start": 0, "end": 500}, ...]}`.
    #[arg(short = 'c', long)]
    cut_list: PathBuf,

    /// Encoder quality to use if a cut boundary forces a re-encode.
    #[arg(short = 'q', long, default_value_t = 23)]
    quality: u32,
}

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    tracing::info!(input = %cli.input.display(), output = %cli.output.display(), "cutter starting");

    if let Err(e) = ffmpeg_the_third::init() {
        tracing::error!("failed to initialize ffmpeg: {e}");
        return ExitCode::FAILURE;
    }
    // No safe wrapper for av_log_set_level in this version of
    // ffmpeg-the-third; same FFI drop as miquels-hls-server's startup.
    unsafe {
        ffmpeg_the_third::ffi::av_log_set_level(ffmpeg_the_third::ffi::AV_LOG_ERROR as i32);
    }

    match run(cli) {
        Ok(()) => {
            tracing::info!("cutter finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cut_list = cutlist_file::load(&cli.cut_list)?;
    let args = RenderArgs {
        quality: cli.quality,
    };
    let sink: Arc<dyn cutter_engine::ProgressSink> = Arc::new(progress::TerminalSink::default());

    cutter_engine::render(&cli.input, &cli.output, cut_list, args, sink)?;
    Ok(())
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
