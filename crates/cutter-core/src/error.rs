// crates/cutter-core/src/error.rs
//
// The structured error kinds a cut-engine worker can fail with. Every
// variant is worker-fatal: whichever worker produces one reports it through
// its error sink, marks its output queues done, and returns. See
// cutter_core::queue for the done-tracking half of that contract.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CutError {
    #[error("could not open input '{0}'")]
    InputOpenFailed(PathBuf),

    #[error("could not read stream info from '{0}'")]
    StreamInfoFailed(PathBuf),

    #[error("input '{path}' is missing a {kind} stream")]
    MissingStream { path: PathBuf, kind: &'static str },

    #[error("failed to copy codec parameters for stream {0}")]
    ParamCopyFailed(usize),

    #[error("could not open output '{0}'")]
    OutputOpenFailed(PathBuf),

    #[error("output path '{0}' has no container format inferable from its extension")]
    OutputFormatNoFile(PathBuf),

    #[error("failed to create output stream {0}")]
    StreamCreateFailed(usize),

    #[error("failed to write output header")]
    HeaderWriteFailed,

    #[error("failed to write packet to stream {0}")]
    PacketWriteFailed(usize),

    #[error("encode failed: {0}")]
    EncodeFailed(String),

    #[error("decode failed: {0}")]
    DecodeFailed(String),

    #[error("invalid cut list: {0}")]
    InvalidCutList(String),
}
