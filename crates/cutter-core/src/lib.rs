// crates/cutter-core/src/lib.rs
//
// Codec-agnostic pieces of the cut engine: the cut-list model, the
// rational time-base arithmetic it's expressed in, the packet/segment
// types the cutter walks, the cutting algorithm itself, the queue fabric
// connecting pipeline stages, and the error type they all report through.
// Nothing in this crate depends on FFmpeg — cutter-engine supplies the
// concrete packet payload and codec-parameters types.

pub mod cutlist;
pub mod cutter;
pub mod error;
pub mod metadata;
pub mod packet;
pub mod queue;
pub mod time;

pub use cutlist::{Cut, CutList, LocalCut, LocalCutList};
pub use cutter::{Cutter, StreamKind};
pub use error::CutError;
pub use metadata::{StreamInfo, StreamMetadata};
pub use packet::{Packet, PacketFlags, Segment};
pub use queue::{ProducerId, SegmentQueue};
pub use time::{rescale_q, TimeBase};
