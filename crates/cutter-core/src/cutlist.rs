// crates/cutter-core/src/cutlist.rs
//
// Cut lists as given by the caller (centiseconds, stream-agnostic) and as
// consumed by the cutter (native time base, per stream). Adjacent cuts are
// merged at construction time — an explicit decision recorded in
// DESIGN.md, not behavior the caller needs to think about.

use crate::error::CutError;
use crate::time::{rescale_q, TimeBase};

/// A half-open interval `[start, end)` in centiseconds, as supplied by a
/// caller of the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cut {
    pub start: i64,
    pub end: i64,
}

impl Cut {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> i64 {
        self.end - self.start
    }
}

/// A validated, sorted, gap-merged list of cuts in centiseconds.
#[derive(Debug, Clone, Default)]
pub struct CutList {
    cuts: Vec<Cut>,
}

impl CutList {
    pub const REFERENCE_TIME_BASE: TimeBase = TimeBase::CENTISECONDS;

    /// Validates ordering and non-negativity, sorts, and merges any cuts
    /// that touch or overlap (`cuts[i].end >= cuts[i+1].start`) into one.
    pub fn new(mut cuts: Vec<Cut>) -> Result<Self, CutError> {
        for c in &cuts {
            if c.start < 0 || c.end < c.start {
                return Err(CutError::InvalidCutList(format!(
                    "cut [{}, {}) is not a valid non-negative, non-empty-or-zero interval",
                    c.start, c.end
                )));
            }
        }
        cuts.sort_by_key(|c| c.start);

        let mut merged: Vec<Cut> = Vec::with_capacity(cuts.len());
        for c in cuts {
            match merged.last_mut() {
                Some(prev) if c.start <= prev.end => {
                    prev.end = prev.end.max(c.end);
                }
                _ => merged.push(c),
            }
        }

        Ok(Self { cuts: merged })
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cut> {
        self.cuts.iter()
    }

    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    /// Rescale every cut into `time_base` ticks relative to the stream's own
    /// start time, producing the per-stream cut list the cutter walks.
    pub fn to_local(&self, time_base: TimeBase, stream_start: i64) -> LocalCutList {
        let cuts = self
            .cuts
            .iter()
            .map(|c| {
                let start = stream_start
                    + rescale_q(c.start, Self::REFERENCE_TIME_BASE, time_base);
                let end = stream_start + rescale_q(c.end, Self::REFERENCE_TIME_BASE, time_base);
                LocalCut { start, end }
            })
            .collect();
        LocalCutList { cuts }
    }
}

/// A cut rescaled into a single stream's native time base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalCut {
    pub start: i64,
    pub end: i64,
}

impl LocalCut {
    pub fn len(&self) -> i64 {
        self.end - self.start
    }

    pub fn contains(&self, t: i64) -> bool {
        t >= self.start && t < self.end
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocalCutList {
    cuts: Vec<LocalCut>,
}

impl LocalCutList {
    pub fn as_slice(&self) -> &[LocalCut] {
        &self.cuts
    }

    pub fn get(&self, i: usize) -> Option<LocalCut> {
        self.cuts.get(i).copied()
    }

    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_interval() {
        assert!(CutList::new(vec![Cut::new(10, 5)]).is_err());
    }

    #[test]
    fn rejects_negative_start() {
        assert!(CutList::new(vec![Cut::new(-1, 5)]).is_err());
    }

    #[test]
    fn sorts_and_merges_touching_cuts() {
        let cl = CutList::new(vec![Cut::new(50, 100), Cut::new(0, 50), Cut::new(200, 300)])
            .unwrap();
        let cuts: Vec<_> = cl.iter().copied().collect();
        assert_eq!(cuts, vec![Cut::new(0, 100), Cut::new(200, 300)]);
    }

    #[test]
    fn merges_overlapping_cuts() {
        let cl = CutList::new(vec![Cut::new(0, 60), Cut::new(40, 100)]).unwrap();
        let cuts: Vec<_> = cl.iter().copied().collect();
        assert_eq!(cuts, vec![Cut::new(0, 100)]);
    }

    #[test]
    fn to_local_rescales_and_offsets() {
        let cl = CutList::new(vec![Cut::new(100, 200)]).unwrap(); // 1s .. 2s
        let tb = TimeBase::new(1, 1000); // milliseconds
        let local = cl.to_local(tb, 500); // stream starts at 500ms
        let c = local.get(0).unwrap();
        assert_eq!(c.start, 1500);
        assert_eq!(c.end, 2500);
    }
}
