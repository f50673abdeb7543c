// crates/cutter-engine/src/orchestrator.rs
//
// `render()` — the one function the FFI and CLI crates actually call.
// Builds the queue fabric, spawns the four pipeline workers, and joins
// them in order, exactly as original_source/src/render.cpp does with
// std::thread. No retries: a worker failure drains downstream queues via
// `mark_done` and the join below surfaces it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use cutter_core::{CutList, SegmentQueue, StreamKind};
use ffmpeg_the_third as ffmpeg;
use tracing::{error, info};

use crate::args::RenderArgs;
use crate::cutter_worker;
use crate::demux;
use crate::error::{EngineError, Result};
use crate::mux;
use crate::progress::ProgressSink;

/// Cuts `input` down to `cut_list` and writes the result to `output`.
/// Blocks the calling thread until every worker has finished; safe to
/// call from any thread, including one driven by a C caller through the
/// FFI crate.
pub fn render(
    input: &Path,
    output: &Path,
    cut_list: CutList,
    args: RenderArgs,
    progress: Arc<dyn ProgressSink>,
) -> Result<()> {
    let _ = args.quality; // forwarded for the re-encode fallback; unused on the copy path.

    let total_usec = probe_duration_usec(input);
    let cut_list = Arc::new(cut_list);

    let video_queue = Arc::new(SegmentQueue::new(1));
    let audio_queue = Arc::new(SegmentQueue::new(1));
    let join_queue = Arc::new(SegmentQueue::new(2));

    let input_owned: PathBuf = input.to_path_buf();
    let demux_handle = {
        let video_queue = video_queue.clone();
        let audio_queue = audio_queue.clone();
        let progress = progress.clone();
        thread::spawn(move || {
            let result = demux::run(&input_owned, &video_queue, &audio_queue);
            if let Err(e) = &result {
                progress.on_error(&e.to_string());
            }
            result
        })
    };

    // The cutters block on `get_special()` until the demuxer publishes
    // stream metadata, so spawning them immediately is safe — no need to
    // wait on the demux thread here.
    let video_handle = {
        let cut_list = cut_list.clone();
        let video_queue = video_queue.clone();
        let join_queue = join_queue.clone();
        let progress = progress.clone();
        thread::spawn(move || {
            cutter_worker::run(
                StreamKind::Video,
                &cut_list,
                &video_queue,
                &join_queue,
                progress.as_ref(),
                total_usec,
            )
        })
    };

    let audio_handle = {
        let cut_list = cut_list.clone();
        let audio_queue = audio_queue.clone();
        let join_queue = join_queue.clone();
        let progress = progress.clone();
        thread::spawn(move || {
            cutter_worker::run(
                StreamKind::Audio,
                &cut_list,
                &audio_queue,
                &join_queue,
                progress.as_ref(),
                total_usec,
            )
        })
    };

    // The muxer needs codec parameters before it can write a header, so —
    // unlike the cutters — it can't just block on its own input queue's
    // special slot (the join queue carries no metadata of its own). Block
    // here instead, on whichever of the two per-stream queues resolves
    // first; both carry the same metadata. If the demuxer failed before
    // ever publishing metadata, `get_special` returns `None` once it marks
    // both queues done — the muxer is never spawned, but every worker that
    // *was* spawned still gets joined below, per spec.md §4.6/§7 ("the
    // orchestrator joins all workers regardless").
    let metadata = video_queue.get_special();

    let mux_handle = metadata.map(|metadata| {
        let output_owned = output.to_path_buf();
        let join_queue = join_queue.clone();
        let progress = progress.clone();
        thread::spawn(move || {
            let result = mux::run(&output_owned, &metadata, &join_queue);
            if let Err(e) = &result {
                progress.on_error(&e.to_string());
            }
            result
        })
    });

    let demux_result = join_worker(demux_handle, "demux");
    let video_result = join_worker(video_handle, "video cutter");
    let audio_result = join_worker(audio_handle, "audio cutter");
    let mux_result = match mux_handle {
        Some(handle) => join_worker(handle, "muxer"),
        None => Err(EngineError::Cut(cutter_core::CutError::StreamInfoFailed(
            input.to_path_buf(),
        ))),
    };

    demux_result?;
    video_result?;
    audio_result?;
    mux_result?;

    info!("render: pipeline complete");
    Ok(())
}

/// Joins one worker's thread handle, always — never short-circuits on a
/// panic, so every call site joins every spawned worker before the first
/// error (panic or otherwise) is propagated.
fn join_worker(handle: thread::JoinHandle<Result<()>>, name: &'static str) -> Result<()> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => {
            error!(worker = name, "worker thread panicked");
            Err(EngineError::WorkerPanicked(name.to_string()))
        }
    }
}

fn probe_duration_usec(path: &Path) -> i64 {
    match ffmpeg::format::input(path) {
        Ok(ctx) => ctx.duration().max(0),
        Err(_) => 0,
    }
}
