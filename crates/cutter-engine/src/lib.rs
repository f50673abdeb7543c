// crates/cutter-engine/src/lib.rs
//
// FFmpeg-backed cut-engine pipeline: demuxer, per-stream cutters, muxer,
// and the thread orchestration tying them together. `cutter_core` carries
// the codec-agnostic algorithm and queue fabric; this crate supplies the
// concrete packet/codec-parameters types and the actual container I/O.

mod args;
mod cutter_worker;
mod demux;
mod error;
mod ffmpeg_packet;
mod metadata;
mod mux;
mod orchestrator;
mod progress;

pub use args::{ArgumentSpec, RenderArgs, ARGUMENTS};
pub use error::{EngineError, Result};
pub use metadata::{EngineMetadata, EngineStreamInfo};
pub use orchestrator::render;
pub use progress::{NullSink, ProgressSink};
