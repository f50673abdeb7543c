// crates/cutter-core/src/packet.rs
//
// The generic packet/segment types the cutter operates on. Generic over the
// payload `P` so the algorithm in `cutter.rs` never touches an FFmpeg type
// directly — cutter-engine supplies `P = ffmpeg_the_third::Packet` and lifts
// the fields the cutter needs via `ffmpeg_packet::to_core`/`apply_to`.

use bitflags::bitflags;

bitflags! {
    /// Mirrors FFmpeg's `AV_PKT_FLAG_*` bits, restricted to the ones the
    /// cutter needs to set or inspect.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PacketFlags: u32 {
        /// Keyframe; GOP boundary.
        const KEY        = 0b001;
        /// Decode this packet to keep reference state correct, but it
        /// falls outside every cut and must not reach the muxer.
        const DISCARD    = 0b010;
        /// This packet falls outside every cut and has no decode
        /// dependents; drop it before muxing rather than sending it
        /// through at all.
        const DISPOSABLE = 0b100;
    }
}

/// One packet, indexed to its stream and carrying whatever payload the
/// caller needs (a decoded buffer, an opaque unit in tests, or an
/// `ffmpeg_the_third::Packet` in the engine).
#[derive(Debug, Clone)]
pub struct Packet<P> {
    pub stream_id: u32,
    /// `None` for streams where FFmpeg itself reports no PTS (rare, but
    /// legal); the cutter treats such a packet as non-droppable on its own.
    pub pts: Option<i64>,
    pub dts: i64,
    pub duration: i64,
    pub flags: PacketFlags,
    pub payload: P,
}

impl<P> Packet<P> {
    pub fn new(stream_id: u32, pts: Option<i64>, dts: i64, duration: i64, payload: P) -> Self {
        Self {
            stream_id,
            pts,
            dts,
            duration,
            flags: PacketFlags::empty(),
            payload,
        }
    }

    pub fn is_key(&self) -> bool {
        self.flags.contains(PacketFlags::KEY)
    }

    pub fn is_discard(&self) -> bool {
        self.flags.contains(PacketFlags::DISCARD)
    }

    pub fn is_disposable(&self) -> bool {
        self.flags.contains(PacketFlags::DISPOSABLE)
    }

    /// The packet's end time in its own time base, falling back to dts+duration
    /// when no pts is present.
    pub fn end_pts(&self) -> i64 {
        self.pts.unwrap_or(self.dts) + self.duration
    }

    /// Remap the payload, keeping every other field untouched. Used to turn a
    /// `Packet<ffmpeg::Packet>` into a `Packet<()>` view for testing, and back.
    pub fn map<Q>(self, f: impl FnOnce(P) -> Q) -> Packet<Q> {
        Packet {
            stream_id: self.stream_id,
            pts: self.pts,
            dts: self.dts,
            duration: self.duration,
            flags: self.flags,
            payload: f(self.payload),
        }
    }
}

/// A GOP-aligned run of packets from the demuxer: starts on a keyframe (for
/// video) and runs up to, but not including, the next one.
pub type Segment<P> = Vec<Packet<P>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_pts_prefers_pts_over_dts() {
        let mut p = Packet::new(0, Some(100), 90, 10, ());
        assert_eq!(p.end_pts(), 110);
        p.pts = None;
        assert_eq!(p.end_pts(), 100);
    }

    #[test]
    fn flags_roundtrip() {
        let mut p = Packet::new(0, Some(0), 0, 0, ());
        assert!(!p.is_key());
        p.flags |= PacketFlags::KEY;
        assert!(p.is_key());
        p.flags |= PacketFlags::DISCARD;
        assert!(p.is_discard());
        assert!(p.is_key());
    }
}
