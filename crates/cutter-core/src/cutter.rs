// crates/cutter-core/src/cutter.rs
//
// The core cutting algorithm: walks a stream's packets in presentation
// order, tracks how much gap time has been removed so far, and marks each
// packet either kept-and-shifted or dropped. A cut list names the ranges
// to KEEP; everything else is a gap. Ported from the incremental
// single-accumulator approach in original_source/src/pipeline/{video,audio}.cpp
// rather than the segment-bucketed closed-form sketched in the prose spec —
// the two are equivalent on every case the spec enumerates, and the
// incremental form needs no special-casing between a segment that sits
// entirely inside a gap, straddles one cut edge, or straddles two.
//
// Two refinements over a plain "subtract the running gap" shift, both
// taken from the source's per-packet loop rather than invented here:
//
//   - a packet whose presentation interval only partially overlaps a cut
//     (the first or last packet of a kept range, straddling its edge)
//     nudges `time_skipped` by the overhang so the shifted timestamp
//     lands exactly on the cut boundary instead of carrying the overhang
//     into the output;
//   - a segment that doesn't overlap any cut at all is dropped wholesale
//     before the per-packet loop runs, rather than walking every packet
//     through the DISCARD path — a GOP the cut list never touches has no
//     decode dependents downstream and shouldn't reach the muxer at all.
//
// The cut/shift bookkeeping above is the only part that runs in
// presentation order (needed for B-frame GOPs, where decode order and
// presentation order differ). DTS monotonicity repair is a separate pass
// afterward, driven over the segment in its original decode order — the
// order the muxer will actually see these packets in — per spec §4.3's
// step 7.

use crate::cutlist::{LocalCut, LocalCutList};
use crate::packet::{Packet, PacketFlags, Segment};

/// Which kind of stream a `Cutter` is tracking — decides whether a
/// dropped packet is marked `DISCARD` (video: still needed so the
/// decoder's reference state survives into the next kept frame) or
/// `DISPOSABLE` (audio: nothing downstream depends on decoding it, so it
/// can be dropped outright), and whether DTS monotonicity repair applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Video,
    Audio,
}

/// Per-stream cutting state, carried across every segment the demuxer
/// hands this stream. One `Cutter` per stream; video and audio each get
/// their own instance even though they share a `CutList`, since each
/// rescales it into its own time base via `CutList::to_local`.
pub struct Cutter {
    kind: StreamKind,
    cuts: LocalCutList,
    /// Index of the earliest cut (keep-range) the playhead hasn't fully
    /// passed yet.
    cursor: usize,
    /// Native-time-base duration of gap material skipped so far; subtracted
    /// from every kept packet's pts/dts. Persists across segments,
    /// including ones with no cut in them at all.
    time_skipped: i64,
    /// Last emitted dts, for monotonicity repair. Video only.
    dts_prev: Option<i64>,
}

impl Cutter {
    pub fn new(kind: StreamKind, cuts: LocalCutList) -> Self {
        Self {
            kind,
            cuts,
            cursor: 0,
            time_skipped: 0,
            dts_prev: None,
        }
    }

    /// Rewrites one GOP-aligned segment in place: packets that fall inside
    /// a cut have their pts/dts shifted back by every gap skipped so far,
    /// with sub-packet precision at a cut's edges (with DTS monotonicity
    /// repaired for video); packets outside every cut are flagged — video
    /// ones reach the muxer as `DISCARD` so the decoder's reference state
    /// survives, audio ones as `DISPOSABLE` so they never do — and their
    /// duration is added to the running gap.
    pub fn process_segment<P>(&mut self, segment: &mut Segment<P>) {
        if segment.is_empty() {
            return;
        }

        let mut order: Vec<usize> = (0..segment.len()).collect();
        order.sort_by_key(|&i| presentation_time(&segment[i]));

        let segment_start = presentation_time(&segment[order[0]]);
        let segment_end = order
            .iter()
            .map(|&i| presentation_time(&segment[i]) + segment[i].duration)
            .max()
            .unwrap();

        while let Some(cut) = self.cuts.get(self.cursor) {
            if cut.end <= segment_start {
                self.cursor += 1;
            } else {
                break;
            }
        }

        let touches_a_cut = self
            .cuts
            .get(self.cursor)
            .is_some_and(|cut| cut.start < segment_end);

        if !touches_a_cut {
            // No decode dependents in this GOP: skip it wholesale rather
            // than flagging every packet DISCARD only to have none of
            // them matter.
            self.time_skipped += order.iter().map(|&i| segment[i].duration).sum::<i64>();
            segment.clear();
            return;
        }

        for idx in order {
            let t = presentation_time(&segment[idx]);
            let duration = segment[idx].duration;

            while let Some(cut) = self.cuts.get(self.cursor) {
                if cut.end <= t {
                    self.cursor += 1;
                } else {
                    break;
                }
            }

            match self.cuts.get(self.cursor) {
                Some(cut) if t + duration > cut.start && t < cut.end => {
                    self.keep_packet(&mut segment[idx], cut, t, duration);
                }
                _ => self.drop_packet(&mut segment[idx], duration),
            }
        }

        // §4.4's DTS fixup must walk the segment in its original decode
        // order, not the presentation order the cut/shift pass above used —
        // B-frames make the two differ, and `dts_prev` has to climb in the
        // order the muxer will actually see these packets in, not the order
        // they were visited while computing the shift.
        if self.kind == StreamKind::Video {
            for packet in segment.iter_mut() {
                let is_kept = !packet.is_discard();
                self.repair_dts(packet, is_kept);
            }
        }
    }

    /// Shifts a packet that falls (at least partly) inside `cut` back by
    /// every gap skipped so far, first refining that gap by any overhang
    /// if this packet is the first or last one straddling the cut's edge
    /// so the shifted timestamp lands exactly on the boundary.
    fn keep_packet<P>(&mut self, packet: &mut Packet<P>, cut: LocalCut, t: i64, duration: i64) {
        let overhang_before_start = t - cut.start;
        if t <= cut.start {
            self.time_skipped -= overhang_before_start;
        }
        let slack_before_end = (cut.end - 1) - t;
        if slack_before_end < duration {
            self.time_skipped += slack_before_end + 1 - duration;
        }

        let shift = self.time_skipped;
        packet.dts -= shift;
        packet.pts = packet.pts.map(|pts| pts - shift);
    }

    /// Flags a packet that falls outside every cut. Video packets still
    /// reach the muxer — the decoder needs their reference state to
    /// reconstruct the next kept frame — so their dts is shifted like a
    /// kept packet's, but their pts is unset so a player never places them
    /// on the seek bar. Audio packets have no such dependent and are
    /// dropped outright.
    fn drop_packet<P>(&mut self, packet: &mut Packet<P>, duration: i64) {
        match self.kind {
            StreamKind::Video => {
                packet.dts -= self.time_skipped;
                packet.pts = None;
                packet.flags |= PacketFlags::DISCARD;
            }
            StreamKind::Audio => {
                packet.flags |= PacketFlags::DISPOSABLE;
            }
        }
        self.time_skipped += duration;
    }

    /// Video-only DTS monotonicity fixup (§4.4): bumps `dts` past the last
    /// emitted one if the shift made it non-increasing. A kept packet's
    /// pts is nudged forward by the same correction so it never ends up
    /// behind the repaired dts; a discarded packet's pts is already unset
    /// and is left alone. Must be driven over the segment in decode order —
    /// see the comment in `process_segment`.
    fn repair_dts<P>(&mut self, packet: &mut Packet<P>, is_kept: bool) {
        if let Some(prev) = self.dts_prev {
            if packet.dts <= prev {
                if is_kept {
                    let correction = prev - packet.dts + 1;
                    packet.pts = packet.pts.map(|pts| pts + correction);
                }
                packet.dts = prev + 1;
            }
        }
        self.dts_prev = Some(packet.dts);
    }

    /// Total native-base gap time skipped so far; exposed for progress
    /// reporting (wall-clock progress needs the *kept* duration, which is
    /// the playhead position minus this).
    pub fn time_skipped(&self) -> i64 {
        self.time_skipped
    }
}

fn presentation_time<P>(packet: &Packet<P>) -> i64 {
    packet.pts.unwrap_or(packet.dts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cutlist::{Cut, CutList};
    use crate::time::TimeBase;

    fn packet(pts: i64, dts: i64, key: bool) -> Packet<()> {
        let mut p = Packet::new(0, Some(pts), dts, 10, ());
        if key {
            p.flags |= PacketFlags::KEY;
        }
        p
    }

    fn local_cuts(pairs: &[(i64, i64)]) -> LocalCutList {
        let cuts = pairs.iter().map(|&(s, e)| Cut::new(s, e)).collect();
        let list = CutList::new(cuts).unwrap();
        list.to_local(TimeBase::new(1, 100), 0)
    }

    #[test]
    fn segment_entirely_inside_the_kept_range_is_untouched() {
        let mut cutter = Cutter::new(StreamKind::Video, local_cuts(&[(0, 100)]));
        let mut seg: Segment<()> = vec![packet(0, 0, true), packet(10, 10, false)];
        cutter.process_segment(&mut seg);
        assert_eq!(seg[0].pts, Some(0));
        assert_eq!(seg[1].pts, Some(10));
        assert!(!seg[0].is_discard());
        assert_eq!(cutter.time_skipped(), 0);
    }

    #[test]
    fn segment_entirely_outside_every_cut_is_dropped_wholesale() {
        let mut cutter = Cutter::new(StreamKind::Video, local_cuts(&[(500, 600)]));
        let mut seg: Segment<()> = vec![packet(10, 10, true), packet(20, 20, false)];
        cutter.process_segment(&mut seg);
        assert!(seg.is_empty(), "a GOP no cut overlaps has no decode dependents, so nothing emits");
        assert_eq!(cutter.time_skipped(), 20); // two 10-tick packets dropped
    }

    #[test]
    fn segment_straddling_a_cut_edge_drops_outside_and_shifts_kept() {
        // cut (kept range) is [30, 50) in the stream's native base.
        let mut cutter = Cutter::new(StreamKind::Video, local_cuts(&[(30, 50)]));
        let mut seg: Segment<()> = vec![
            packet(0, 0, true),
            packet(10, 10, false),
            packet(30, 30, false),
            packet(40, 40, false),
            packet(50, 50, false),
        ];
        cutter.process_segment(&mut seg);
        assert!(seg[0].is_discard());
        assert!(seg[1].is_discard());
        assert_eq!(seg[0].pts, None, "discarded video packets carry no pts onto the muxer");
        assert_eq!(seg[2].pts, Some(30 - 20)); // shifted by the 20-tick leading gap
        assert_eq!(seg[3].pts, Some(40 - 20));
        assert!(seg[4].is_discard()); // pts == cut.end, past the kept range
        assert_eq!(cutter.time_skipped(), 30); // three dropped packets (0, 10, 50) at 10 ticks each
    }

    #[test]
    fn packet_straddling_a_cut_s_leading_edge_absorbs_the_overhang() {
        // cut [30, 50); a packet starting at 25 with duration 10 covers
        // [25, 35) and is the first one to overlap the cut. The 5 ticks
        // of overhang before the cut start fold into the running gap
        // rather than being shifted straight through.
        let mut cutter = Cutter::new(StreamKind::Video, local_cuts(&[(30, 50)]));
        let mut seg: Segment<()> = vec![Packet::new(0, Some(25), 25, 10, ())];
        seg[0].flags |= PacketFlags::KEY;
        cutter.process_segment(&mut seg);
        assert!(!seg[0].is_discard());
        assert_eq!(cutter.time_skipped(), 5);
        assert_eq!(seg[0].pts, Some(20)); // 25 shifted back by the 5-tick overhang
    }

    #[test]
    fn time_skipped_persists_across_segments_with_no_cut() {
        let mut cutter = Cutter::new(StreamKind::Audio, local_cuts(&[(100, 200)]));
        let mut seg1: Segment<()> = vec![packet(0, 0, false)];
        cutter.process_segment(&mut seg1);
        assert!(seg1.is_empty());
        assert_eq!(cutter.time_skipped(), 10);

        let mut seg2: Segment<()> = vec![packet(120, 120, false)];
        cutter.process_segment(&mut seg2);
        assert_eq!(seg2[0].pts, Some(110));
        assert_eq!(cutter.time_skipped(), 10);
    }

    #[test]
    fn video_dts_monotonicity_is_repaired() {
        // Two packets sharing a dts — the second must be bumped past the
        // first even though neither one's own shift would force that.
        let mut cutter = Cutter::new(StreamKind::Video, local_cuts(&[(0, 100)]));
        let mut seg: Segment<()> = vec![
            Packet::new(0, Some(0), 0, 10, ()),
            Packet::new(0, Some(5), 0, 10, ()),
        ];
        seg[0].flags |= PacketFlags::KEY;
        cutter.process_segment(&mut seg);
        assert!(seg[1].dts > seg[0].dts);
        assert!(seg[1].pts.unwrap() >= seg[1].dts, "pts >= dts invariant");
    }

    #[test]
    fn dts_repair_runs_in_decode_order_not_presentation_order() {
        // A GOP with B-frames: decode order (array position, which is what
        // the muxer will see) differs from presentation order. Array
        // position 0 is the keyframe with the *latest* pts (it's decoded
        // first but displayed last among these three); positions 1 and 2
        // present earlier but decode later. A cut straddles the segment so
        // position 0 ends up DISCARD while 1 and 2 are kept. Repairing DTS
        // monotonicity in presentation order (1, 2, 0) would bump packet 0
        // past both of them, then emit packets in decode order 0, 1, 2 with
        // dts 21, 5, 20 — not monotonic. Repairing in decode order keeps it
        // monotonic.
        let mut cutter = Cutter::new(StreamKind::Video, local_cuts(&[(15, 25)]));
        let mut seg: Segment<()> = vec![
            Packet::new(0, Some(30), 0, 10, ()),  // decoded 1st, displayed 3rd
            Packet::new(0, Some(10), 10, 10, ()), // decoded 2nd, displayed 1st
            Packet::new(0, Some(20), 20, 10, ()), // decoded 3rd, displayed 2nd
        ];
        seg[0].flags |= PacketFlags::KEY;

        cutter.process_segment(&mut seg);

        assert!(seg[0].is_discard(), "presents at [30,40), entirely past the cut");
        assert!(!seg[1].is_discard());
        assert!(!seg[2].is_discard());

        // Emitted (array/decode) order must be strictly monotonic.
        assert!(seg[1].dts > seg[0].dts, "{} > {}", seg[1].dts, seg[0].dts);
        assert!(seg[2].dts > seg[1].dts, "{} > {}", seg[2].dts, seg[1].dts);

        for p in seg.iter().filter(|p| !p.is_discard()) {
            assert!(p.pts.unwrap() >= p.dts, "pts >= dts invariant");
        }
    }

    #[test]
    fn audio_never_repairs_dts_and_never_discards() {
        let mut cutter = Cutter::new(StreamKind::Audio, local_cuts(&[(0, 100)]));
        let mut seg: Segment<()> = vec![packet(0, 0, false)];
        cutter.process_segment(&mut seg);
        assert!(!seg[0].is_discard());
        assert!(!seg[0].is_disposable());
    }
}
