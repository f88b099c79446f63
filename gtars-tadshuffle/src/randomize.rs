//! Random re-layout of a full partition that keeps its length multiset.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::{FullPartition, Segment};

/// Shuffle the segment lengths of `partition` and lay them out contiguously
/// from position 1.
///
/// The result has the same multiset of lengths and the same total length as
/// the input; only the segment positions change.
pub fn randomize<R: Rng + ?Sized>(partition: &FullPartition, rng: &mut R) -> FullPartition {
    // segments are sorted by start, so the draw depends only on the partition
    let mut lens: Vec<u32> = partition.iter().map(Segment::len).collect();
    lens.shuffle(rng);

    let mut randomized = lay_out(&lens);
    randomized.universe_size = partition.universe_size;
    randomized
}

/// Lay `lens` out back to back: segment `i` spans
/// `[offset_i + 1, offset_i + lens[i]]` where `offset_i` is the sum of the
/// lengths before it. Zero lengths are skipped.
pub fn lay_out(lens: &[u32]) -> FullPartition {
    let mut segments = Vec::with_capacity(lens.len());
    let mut offset: u32 = 0;
    for &len in lens.iter().filter(|&&l| l > 0) {
        segments.push(Segment::new(offset + 1, offset + len));
        offset += len;
    }
    FullPartition::new(offset, segments)
}
