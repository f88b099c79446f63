//! Partition invariant checks, run only when validation is switched on.
//!
//! Each check is a self-contained post-condition on its inputs and reports
//! the first violation as [`TadShuffleError::InvariantViolation`].

use crate::errors::{Invariant, Result, TadShuffleError};
use crate::models::{Domain, FullPartition, Segment};

fn violation(chrom: &str, invariant: Invariant, detail: String) -> TadShuffleError {
    TadShuffleError::InvariantViolation {
        chrom: chrom.to_string(),
        invariant,
        detail,
    }
}

/// Sweep sorted segments and classify the first defect found, if any.
fn sweep(segments: &[Segment], universe_size: u32) -> Option<(Invariant, String)> {
    let mut sorted = segments.to_vec();
    sorted.sort_unstable();

    let mut covered_to: u32 = 0;
    for seg in &sorted {
        if seg.is_empty() {
            return Some((Invariant::Coverage, format!("empty segment [{}]", seg)));
        }
        if seg.start <= covered_to {
            return Some((
                Invariant::Disjoint,
                format!("segment [{}] overlaps a segment ending at {}", seg, covered_to),
            ));
        }
        if seg.start != covered_to + 1 {
            return Some((
                Invariant::Coverage,
                format!("positions {}..={} uncovered", covered_to + 1, seg.start - 1),
            ));
        }
        covered_to = seg.end;
    }

    if covered_to != universe_size {
        let detail = if covered_to > universe_size {
            format!("segments extend to {} past universe size {}", covered_to, universe_size)
        } else {
            format!("positions {}..={} uncovered", covered_to + 1, universe_size)
        };
        return Some((Invariant::Coverage, detail));
    }
    None
}

/// Assert `partition` is pairwise disjoint and covers `[1, universe_size]` exactly.
pub fn check_partition(chrom: &str, partition: &FullPartition) -> Result<()> {
    match sweep(&partition.segments, partition.universe_size) {
        Some((invariant, detail)) => Err(violation(chrom, invariant, detail)),
        None => Ok(()),
    }
}

/// Assert the randomized layout has total length `universe_size` and touches
/// every position exactly once.
pub fn check_randomized(chrom: &str, randomized: &FullPartition, universe_size: u32) -> Result<()> {
    let total = randomized.total_length();
    if total != universe_size as u64 {
        return Err(violation(
            chrom,
            Invariant::RandomizedLength,
            format!("total length {} != universe size {}", total, universe_size),
        ));
    }
    if let Some((_, detail)) = sweep(&randomized.segments, universe_size) {
        return Err(violation(chrom, Invariant::RandomizedCoverage, detail));
    }
    Ok(())
}

/// Assert the resampled domains have the same summed length as the originals.
pub fn check_resampled(chrom: &str, resampled: &[Domain], original: &[Domain]) -> Result<()> {
    let resampled_len: u64 = resampled.iter().map(|d| d.len() as u64).sum();
    let original_len: u64 = original.iter().map(|d| d.len() as u64).sum();
    if resampled_len != original_len {
        return Err(violation(
            chrom,
            Invariant::DomainLength,
            format!("resampled length {} != original length {}", resampled_len, original_len),
        ));
    }
    Ok(())
}
