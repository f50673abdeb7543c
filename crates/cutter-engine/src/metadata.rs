// crates/cutter-engine/src/metadata.rs
//
// cutter_core::metadata is generic over the codec-parameters payload; here
// we fix that payload to ffmpeg_the_third's owned `codec::Parameters`,
// which is what the demuxer actually has to hand the muxer.

use ffmpeg_the_third::codec::Parameters;

pub type EngineStreamInfo = cutter_core::StreamInfo<Parameters>;
pub type EngineMetadata = cutter_core::StreamMetadata<Parameters>;
