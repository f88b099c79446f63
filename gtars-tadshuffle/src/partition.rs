//! Completion of a partial domain list into a full partition of the universe.

use crate::models::{Domain, FullPartition, Segment};

/// Fill every position of `[1, universe_size]` not claimed by a domain with a
/// gap segment, and return domains plus gaps as one partition.
///
/// Domains must not overlap and must end at or before `universe_size`; this
/// is not checked here (see [`crate::validate::check_partition`]).
pub fn complete_partition(domains: &[Domain], universe_size: u32) -> FullPartition {
    let mut sorted: Vec<Segment> = domains.to_vec();
    sorted.sort_unstable_by_key(|d| d.start);

    let mut gaps: Vec<Segment> = Vec::new();
    // u64 so a domain ending at u32::MAX does not wrap
    let mut next_free: u64 = 1;
    for domain in &sorted {
        if next_free < domain.start as u64 {
            gaps.push(Segment::new(next_free as u32, domain.start - 1));
        }
        next_free = domain.end as u64 + 1;
    }
    if next_free <= universe_size as u64 {
        gaps.push(Segment::new(next_free as u32, universe_size));
    }

    sorted.extend(gaps);
    sorted.retain(|s| !s.is_empty());

    FullPartition::new(universe_size, sorted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::check_partition;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn segs(pairs: &[(u32, u32)]) -> Vec<Segment> {
        pairs.iter().map(|&p| Segment::from(p)).collect()
    }

    #[rstest]
    fn test_gap_on_both_sides() {
        let partition = complete_partition(&segs(&[(2, 4)]), 6);
        assert_eq!(partition.segments, segs(&[(1, 1), (2, 4), (5, 6)]));
    }

    #[rstest]
    fn test_no_gaps_when_domains_cover_universe() {
        let partition = complete_partition(&segs(&[(4, 4), (1, 3)]), 4);
        assert_eq!(partition.segments, segs(&[(1, 3), (4, 4)]));
    }

    #[rstest]
    fn test_gaps_between_domains() {
        let partition = complete_partition(&segs(&[(10, 12), (3, 5), (6, 6)]), 15);
        assert_eq!(
            partition.segments,
            segs(&[(1, 2), (3, 5), (6, 6), (7, 9), (10, 12), (13, 15)])
        );
    }

    #[rstest]
    #[case(vec![], 0)]
    #[case(vec![], 5)]
    #[case(vec![(1, 1)], 1)]
    #[case(vec![(2, 3), (7, 9)], 12)]
    #[case(vec![(1, 4), (5, 8), (9, 12)], 12)]
    fn test_result_is_full_partition(#[case] pairs: Vec<(u32, u32)>, #[case] n: u32) {
        let partition = complete_partition(&segs(&pairs), n);
        assert!(check_partition("chr1", &partition).is_ok());
        assert_eq!(partition.total_length(), n as u64);
    }

    #[rstest]
    fn test_domain_ending_at_max_index() {
        let partition = complete_partition(&segs(&[(5, u32::MAX)]), u32::MAX);
        assert_eq!(partition.segments, segs(&[(1, 4), (5, u32::MAX)]));
        assert!(check_partition("chr1", &partition).is_ok());
    }

    #[rstest]
    fn test_empty_universe_and_domains() {
        let partition = complete_partition(&[], 0);
        assert!(partition.is_empty());
    }

    #[rstest]
    fn test_empty_domains_single_gap() {
        let partition = complete_partition(&[], 5);
        assert_eq!(partition.segments, segs(&[(1, 5)]));
    }
}
