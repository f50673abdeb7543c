// crates/cutter-engine/src/cutter_worker.rs
//
// Wraps cutter_core::Cutter with the FFmpeg packet adapter and the queue
// plumbing that lets one function serve both the video and audio stages:
// pull a segment, lift its packets into the generic representation,
// rewrite them, push whichever survive onward. Mirrors
// original_source/src/pipeline/video.cpp and audio.cpp, which differ only
// in flag choice and DTS repair — both captured by `cutter_core::Cutter`.

use std::sync::Arc;

use cutter_core::{rescale_q, CutList, Cutter, Segment, SegmentQueue, StreamKind, TimeBase};
use ffmpeg_the_third::Packet as AvPacket;
use tracing::debug;

use crate::error::Result;
use crate::ffmpeg_packet;
use crate::metadata::EngineMetadata;
use crate::progress::{ProgressSink, ProgressTicker};

pub type JoinQueue = SegmentQueue<Segment<AvPacket>, ()>;

#[derive(Clone, Copy)]
struct Timing {
    time_base: TimeBase,
    start_time: i64,
}

/// Runs one stream's cutting stage to completion: blocks for metadata,
/// rescales the cut list into this stream's native time base, then drains
/// `input` segment by segment, forwarding the kept/flagged result to
/// `output`.
pub fn run(
    kind: StreamKind,
    cut_list: &CutList,
    input: &SegmentQueue<Segment<AvPacket>, Arc<EngineMetadata>>,
    output: &JoinQueue,
    progress: &dyn ProgressSink,
    total_usec: i64,
) -> Result<()> {
    let output_producer = output.register_producer();
    let stage = match kind {
        StreamKind::Video => "video",
        StreamKind::Audio => "audio",
    };
    let ticker = ProgressTicker::default();
    const USEC: TimeBase = TimeBase::new(1, 1_000_000);

    let result = (|| -> Result<()> {
        let metadata = input.get_special();
        let timing = timing_for(kind, metadata.as_deref())?;

        let local_cuts = cut_list.to_local(timing.time_base, timing.start_time);
        let mut cutter = Cutter::new(kind, local_cuts);

        while let Some(mut segment) = input.pop() {
            // Read the playhead position before `process_segment` rewrites
            // (or clears) the segment — a wholly-discarded GOP still
            // advances progress even though nothing of it survives.
            let last_pts = segment
                .iter()
                .map(|p| p.pts.unwrap_or(p.dts) + p.duration)
                .max()
                .unwrap_or(0);
            cutter.process_segment(&mut segment);
            let kept: Segment<AvPacket> = segment
                .into_iter()
                .filter(|p| !p.is_disposable())
                .map(ffmpeg_packet::apply_to)
                .collect();
            if !kept.is_empty() {
                output.push(kept);
            }

            if ticker.tick() && total_usec > 0 {
                let position_usec = rescale_q(last_pts, timing.time_base, USEC);
                let fraction = (position_usec as f64 / total_usec as f64).clamp(0.0, 1.0);
                progress.on_progress(stage, fraction);
            }
        }
        progress.on_progress(stage, 1.0);
        debug!(time_skipped = cutter.time_skipped(), "cutter: stream drained");
        Ok(())
    })();

    output.mark_done(output_producer);
    if let Err(e) = &result {
        progress.on_error(&e.to_string());
    }
    result
}

fn timing_for(kind: StreamKind, metadata: Option<&EngineMetadata>) -> Result<Timing> {
    let metadata = metadata.ok_or_else(|| {
        cutter_core::CutError::InvalidCutList("demuxer produced no stream metadata".into())
    })?;
    let info = match kind {
        StreamKind::Video => metadata.video.as_ref(),
        StreamKind::Audio => metadata.audio.as_ref(),
    };
    let info = info.ok_or_else(|| cutter_core::CutError::MissingStream {
        path: Default::default(),
        kind: match kind {
            StreamKind::Video => "video",
            StreamKind::Audio => "audio",
        },
    })?;
    Ok(Timing {
        time_base: info.time_base,
        start_time: info.start_time,
    })
}
