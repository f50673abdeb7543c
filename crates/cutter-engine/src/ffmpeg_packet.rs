// crates/cutter-engine/src/ffmpeg_packet.rs
//
// Bridges cutter_core::Packet<P>, which only knows about pts/dts/duration/
// flags as plain fields, and ffmpeg_the_third::Packet, which keeps them
// inside the AVPacket it owns. `to_core` lifts one out for the cutter to
// rewrite; `apply_to` writes the cutter's verdict back before the packet
// is handed to the muxer.

use cutter_core::{Packet, PacketFlags};
use ffmpeg_the_third::codec::packet::flag::Flags as AvFlags;
use ffmpeg_the_third::Packet as AvPacket;

/// Lifts an FFmpeg packet into the generic type the cutter walks, keeping
/// the original packet as the payload so it can be recovered afterwards.
pub fn to_core(stream_id: u32, raw: AvPacket) -> Option<Packet<AvPacket>> {
    let dts = raw.dts()?;
    let duration = raw.duration();
    let mut packet = Packet::new(stream_id, raw.pts(), dts, duration, raw);

    if packet.payload.is_key() {
        packet.flags |= PacketFlags::KEY;
    }
    Some(packet)
}

/// Writes the cutter's rewritten pts/dts/flags back onto the underlying
/// FFmpeg packet and returns it, ready to hand to the muxer (or to drop,
/// if the caller already checked `is_discard`/`is_disposable`).
pub fn apply_to(packet: Packet<AvPacket>) -> AvPacket {
    let Packet {
        pts,
        dts,
        flags,
        mut payload,
        ..
    } = packet;

    payload.set_pts(pts);
    payload.set_dts(Some(dts));

    let mut av_flags = payload.flags();
    av_flags.set(AvFlags::DISCARD, flags.contains(PacketFlags::DISCARD));
    payload.set_flags(av_flags);

    payload
}

#[cfg(test)]
mod tests {
    // `to_core`/`apply_to` need a live FFmpeg packet to exercise meaningfully;
    // the pure rewriting logic they wrap is covered by cutter_core::cutter's
    // tests against `Packet<()>`.
}
