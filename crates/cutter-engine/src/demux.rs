// crates/cutter-engine/src/demux.rs
//
// The first pipeline stage: opens the input once, locates its video and
// audio streams, publishes their metadata, then slices the interleaved
// packet stream into GOP-aligned segments and hands each stream's
// segments to its own queue. Ported from
// original_source/src/pipeline/segmentation.cpp.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cutter_core::{Segment, SegmentQueue, StreamInfo};
use ffmpeg_the_third as ffmpeg;
use ffmpeg_the_third::format::context::Input;
use ffmpeg_the_third::media::Type as MediaType;
use ffmpeg_the_third::Packet as AvPacket;
use tracing::{debug, info};

use crate::error::{EngineError, Result};
use crate::ffmpeg_packet;
use crate::metadata::EngineMetadata;

pub type VideoQueue = SegmentQueue<Segment<AvPacket>, Arc<EngineMetadata>>;
pub type AudioQueue = SegmentQueue<Segment<AvPacket>, Arc<EngineMetadata>>;

/// Runs the demuxer to completion on the calling thread. Spawned onto its
/// own worker thread by the orchestrator; reports its failure through
/// `video_queue`/`audio_queue` by marking them done before returning.
pub fn run(path: &Path, video_queue: &VideoQueue, audio_queue: &AudioQueue) -> Result<()> {
    let video_producer = video_queue.register_producer();
    let audio_producer = audio_queue.register_producer();

    match demux(path, video_queue, audio_queue) {
        Ok(()) => {
            video_queue.mark_done(video_producer);
            audio_queue.mark_done(audio_producer);
            Ok(())
        }
        Err(e) => {
            video_queue.mark_done(video_producer);
            audio_queue.mark_done(audio_producer);
            Err(e)
        }
    }
}

fn demux(path: &Path, video_queue: &VideoQueue, audio_queue: &AudioQueue) -> Result<()> {
    let mut ictx: Input = ffmpeg::format::input(path)
        .map_err(|e| EngineError::ffmpeg(path, e))?;

    let video_index = ictx
        .streams()
        .best(MediaType::Video)
        .map(|s| s.index())
        .ok_or_else(|| missing_stream(path, "video"))?;
    let audio_index = ictx
        .streams()
        .best(MediaType::Audio)
        .map(|s| s.index())
        .ok_or_else(|| missing_stream(path, "audio"))?;

    let metadata = Arc::new(build_metadata(&ictx, video_index, audio_index));
    video_queue.set_special(metadata.clone());
    audio_queue.set_special(metadata);

    info!(video_index, audio_index, "demux: streams located");

    let mut video_segment: Segment<AvPacket> = Vec::new();
    let mut audio_segment: Segment<AvPacket> = Vec::new();

    for (stream, packet) in ictx.packets() {
        let index = stream.index();
        if index == video_index {
            let is_key = packet.is_key();
            if is_key && !video_segment.is_empty() {
                flush(video_queue, &mut video_segment);
                // Audio is re-segmented on every video GOP boundary so both
                // cutters make comparable progress through the file; the
                // algorithm itself does not require audio segments to line
                // up with video ones.
                flush(audio_queue, &mut audio_segment);
            }
            if let Some(core_pkt) = ffmpeg_packet::to_core(index as u32, packet) {
                video_segment.push(core_pkt);
            }
        } else if index == audio_index {
            if let Some(core_pkt) = ffmpeg_packet::to_core(index as u32, packet) {
                audio_segment.push(core_pkt);
            }
        }
    }

    flush(video_queue, &mut video_segment);
    flush(audio_queue, &mut audio_segment);

    debug!("demux: input drained");
    Ok(())
}

fn flush<M>(queue: &SegmentQueue<Segment<AvPacket>, M>, segment: &mut Segment<AvPacket>) {
    if segment.is_empty() {
        return;
    }
    queue.push(std::mem::take(segment));
}

fn build_metadata(ictx: &Input, video_index: usize, audio_index: usize) -> EngineMetadata {
    let video_stream = ictx.stream(video_index).expect("video_index in range");
    let audio_stream = ictx.stream(audio_index).expect("audio_index in range");

    EngineMetadata::new(Some(stream_info(&video_stream)), Some(stream_info(&audio_stream)))
}

fn stream_info(
    stream: &ffmpeg_the_third::format::stream::Stream,
) -> StreamInfo<ffmpeg_the_third::codec::Parameters> {
    let time_base = stream.time_base();
    let start_time = if stream.start_time() == ffmpeg_the_third::ffi::AV_NOPTS_VALUE {
        0
    } else {
        stream.start_time()
    };
    StreamInfo {
        stream_id: stream.index() as u32,
        time_base: cutter_core::TimeBase::new(time_base.numerator() as i64, time_base.denominator() as i64),
        start_time,
        codec_parameters: stream.parameters(),
    }
}

fn missing_stream(path: &Path, kind: &'static str) -> EngineError {
    EngineError::Cut(cutter_core::CutError::MissingStream {
        path: PathBuf::from(path),
        kind,
    })
}
