// crates/cutter-core/src/metadata.rs
//
// Per-stream metadata published once by the demuxer and read by every
// downstream worker through `SegmentQueue::get_special`. Generic over the
// codec-parameters payload `C` for the same reason `Packet<P>` is generic
// over its payload: cutter-engine fills it with a deep copy of an
// `ffmpeg_the_third::codec::Parameters`, tests fill it with `()`.

use crate::time::TimeBase;

#[derive(Debug, Clone)]
pub struct StreamInfo<C> {
    pub stream_id: u32,
    pub time_base: TimeBase,
    /// The stream's first packet's dts/pts, in its own time base. Cut
    /// lists are anchored to zero; this is what lets `CutList::to_local`
    /// offset them to where the stream actually starts.
    pub start_time: i64,
    pub codec_parameters: C,
}

#[derive(Debug, Clone)]
pub struct StreamMetadata<C> {
    pub video: Option<StreamInfo<C>>,
    pub audio: Option<StreamInfo<C>>,
}

impl<C> StreamMetadata<C> {
    pub fn new(video: Option<StreamInfo<C>>, audio: Option<StreamInfo<C>>) -> Self {
        Self { video, audio }
    }
}
