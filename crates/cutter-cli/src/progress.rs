// crates/cutter-cli/src/progress.rs
//
// Logs render progress through `tracing` instead of a progress bar — the
// four pipeline workers report concurrently and interleaved percentage
// lines are good enough for a CLI tool that's usually run once per file.

use std::sync::atomic::{AtomicU8, Ordering};

use cutter_engine::ProgressSink;

#[derive(Default)]
pub struct TerminalSink {
    last_logged_pct: AtomicU8,
}

impl ProgressSink for TerminalSink {
    fn on_progress(&self, stage: &str, fraction: f64) {
        let pct = (fraction.clamp(0.0, 1.0) * 100.0).round() as u8;
        let last = self.last_logged_pct.swap(pct, Ordering::Relaxed);
        if pct != last {
            tracing::info!(stage, pct, "progress");
        }
    }

    fn on_error(&self, message: &str) {
        tracing::error!("{message}");
    }
}
