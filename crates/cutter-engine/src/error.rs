// crates/cutter-engine/src/error.rs
//
// Wraps cutter_core::CutError with the FFmpeg-specific failures that only
// show up once an actual container is involved (open/demux/mux). The FFI
// and CLI crates both convert this into their own error surface at their
// boundary — cutter-engine itself never formats a user-facing message.

use std::path::PathBuf;

use cutter_core::CutError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Cut(#[from] CutError),

    #[error("ffmpeg error on '{path}': {source}")]
    Ffmpeg {
        path: PathBuf,
        #[source]
        source: ffmpeg_the_third::Error,
    },

    #[error("worker thread panicked: {0}")]
    WorkerPanicked(String),
}

impl EngineError {
    pub fn ffmpeg(path: impl Into<PathBuf>, source: ffmpeg_the_third::Error) -> Self {
        Self::Ffmpeg {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
