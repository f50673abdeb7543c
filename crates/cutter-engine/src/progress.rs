// crates/cutter-engine/src/progress.rs
//
// The progress/error sink every worker reports through. A trait object
// rather than a channel (contrast with the teacher's
// `crossbeam_channel::Sender<MediaResult>`) because the FFI boundary hands
// us a pair of bare C function pointers that need calling directly and
// safely from whichever worker thread hits a checkpoint, not a typed
// message queue with its own receiver thread.

use std::sync::atomic::{AtomicU64, Ordering};

/// Receives progress and diagnostic callbacks from pipeline workers.
/// Implementations must be safe to call concurrently from any worker
/// thread — the four pipeline stages all report through the same sink.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, stage: &str, fraction: f64);
    fn on_error(&self, message: &str);
}

/// A sink that discards everything; useful for library callers that don't
/// want progress reporting.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_progress(&self, _stage: &str, _fraction: f64) {}
    fn on_error(&self, _message: &str) {}
}

/// How many packets a cutter processes between progress reports.
pub const PROGRESS_INTERVAL: u64 = 64;

/// A small atomic counter that decides, cheaply, whether the current
/// packet is a reporting checkpoint — avoids a float division on every
/// single packet in the hot loop.
#[derive(Default)]
pub struct ProgressTicker {
    count: AtomicU64,
}

impl ProgressTicker {
    pub fn tick(&self) -> bool {
        let n = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        n % PROGRESS_INTERVAL == 0
    }
}
