// crates/cutter-engine/src/mux.rs
//
// The final pipeline stage: allocates the output container, copies the
// codec parameters the cutters never needed to touch, and writes every
// surviving packet through in whatever order the cutters hand it over —
// interleaving is the muxer's job, not ours. Ported from
// original_source/src/pipeline/join.cpp.

use std::path::Path;

use ffmpeg_the_third as ffmpeg;
use ffmpeg_the_third::ffi;
use ffmpeg_the_third::format::context::Output;
use ffmpeg_the_third::Packet as AvPacket;
use tracing::info;

use crate::cutter_worker::JoinQueue;
use crate::error::{EngineError, Result};
use crate::metadata::EngineMetadata;

pub fn run(path: &Path, metadata: &EngineMetadata, input: &JoinQueue) -> Result<()> {
    let mut octx: Output =
        ffmpeg::format::output(path).map_err(|e| EngineError::ffmpeg(path, e))?;

    let video_info = metadata
        .video
        .as_ref()
        .expect("demuxer always publishes a video stream");
    let audio_info = metadata
        .audio
        .as_ref()
        .expect("demuxer always publishes an audio stream");

    let video_index = add_copy_stream(&mut octx, video_info)?;
    let audio_index = add_copy_stream(&mut octx, audio_info)?;

    octx.write_header().map_err(|e| EngineError::ffmpeg(path, e))?;

    let mut packets_written: u64 = 0;
    while let Some(segment) = input.pop() {
        for mut packet in segment {
            let dest_index = if packet.stream() == video_info.stream_id as usize {
                video_index
            } else if packet.stream() == audio_info.stream_id as usize {
                audio_index
            } else {
                continue;
            };
            packet.set_stream(dest_index);
            packet
                .write_interleaved(&mut octx)
                .map_err(|e| EngineError::ffmpeg(path, e))?;
            packets_written += 1;
        }
    }

    octx.write_trailer().map_err(|e| EngineError::ffmpeg(path, e))?;
    info!(packets_written, "mux: output finalized");
    Ok(())
}

/// Adds an output stream whose codecpar is a verbatim copy of the input
/// stream's, for a pure remux of content the cutters left untouched.
/// `format::context::Output::add_stream` wants a concrete encoder, which
/// doesn't exist on the copy path, so this drops to the same
/// `avformat_new_stream` / `avcodec_parameters_copy` pair join.cpp uses.
fn add_copy_stream(
    octx: &mut Output,
    info: &cutter_core::StreamInfo<ffmpeg::codec::Parameters>,
) -> Result<usize> {
    unsafe {
        let stream_ptr = ffi::avformat_new_stream(octx.as_mut_ptr(), std::ptr::null());
        if stream_ptr.is_null() {
            return Err(EngineError::Cut(cutter_core::CutError::StreamCreateFailed(
                info.stream_id as usize,
            )));
        }

        let ret = ffi::avcodec_parameters_copy((*stream_ptr).codecpar, info.codec_parameters.as_ptr());
        if ret < 0 {
            return Err(EngineError::Cut(cutter_core::CutError::ParamCopyFailed(
                info.stream_id as usize,
            )));
        }

        (*(*stream_ptr).codecpar).codec_tag = 0;
        (*stream_ptr).time_base = ffi::AVRational {
            num: info.time_base.num as i32,
            den: info.time_base.den as i32,
        };

        Ok((*stream_ptr).index as usize)
    }
}
