//! Per-length sampling of domains from a randomized partition.

use std::collections::BTreeMap;

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::{Domain, FullPartition, LengthDistribution, Segment};

/// A length the randomized partition could not supply often enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Underfill {
    pub length: u32,
    pub required: usize,
    pub available: usize,
}

/// Domains drawn from a randomized partition, plus the lengths that came up short.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resampled {
    pub domains: Vec<Domain>,
    pub underfilled: Vec<Underfill>,
}

/// Pick, for every length in `target`, up to `target.count(length)` segments
/// of that length from `randomized`, uniformly at random.
///
/// Segments whose length is absent from `target` are never picked. When the
/// partition has fewer segments of a length than required, all of them are
/// taken and the shortfall is recorded in [`Resampled::underfilled`] rather
/// than treated as an error. Domains are returned sorted by start.
pub fn resample<R: Rng + ?Sized>(
    randomized: &FullPartition,
    target: &LengthDistribution,
    rng: &mut R,
) -> Resampled {
    let mut available: BTreeMap<u32, Vec<Segment>> = BTreeMap::new();
    for seg in randomized.iter() {
        available.entry(seg.len()).or_default().push(*seg);
    }

    let mut domains: Vec<Domain> = Vec::new();
    for (length, blocks) in available.iter_mut() {
        if !target.contains(*length) {
            continue;
        }
        blocks.shuffle(rng);
        domains.extend(blocks.iter().take(target.count(*length)).copied());
    }
    domains.sort_unstable();

    let underfilled: Vec<Underfill> = target
        .iter()
        .filter_map(|(length, required)| {
            let have = available.get(&length).map_or(0, Vec::len);
            (have < required).then_some(Underfill {
                length,
                required,
                available: have,
            })
        })
        .collect();

    for u in &underfilled {
        debug!(
            "Length {} under-filled: {} required, {} available",
            u.length, u.required, u.available
        );
    }

    Resampled {
        domains,
        underfilled,
    }
}
