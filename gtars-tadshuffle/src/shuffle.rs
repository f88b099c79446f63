//! Per-chromosome orchestration of complete -> randomize -> resample.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::errors::{Result, TadShuffleError};
use crate::models::{ChromDomains, Domain, LengthDistribution, NodeCounts, ShuffleConfig};
use crate::partition::complete_partition;
use crate::randomize::randomize;
use crate::resample::{Resampled, resample};
use crate::validate;

/// Shuffle the domains of one chromosome over a universe of `universe_size`
/// segments, keeping the per-length domain counts.
///
/// With `validate` set, every stage is checked and the first broken
/// invariant aborts with [`TadShuffleError::InvariantViolation`].
pub fn shuffle_chromosome<R: Rng + ?Sized>(
    chrom: &str,
    domains: &[Domain],
    universe_size: u32,
    rng: &mut R,
    validate: bool,
) -> Result<Resampled> {
    let original = complete_partition(domains, universe_size);
    if validate {
        validate::check_partition(chrom, &original)?;
    }

    let randomized = randomize(&original, rng);
    let distribution = LengthDistribution::from_domains(domains);
    let resampled = resample(&randomized, &distribution, rng);

    if validate {
        validate::check_randomized(chrom, &randomized, universe_size)?;
        validate::check_resampled(chrom, &resampled.domains, domains)?;
    }

    debug!(
        "{}: {} domains in, {} domains out ({} segments in partition)",
        chrom,
        domains.len(),
        resampled.domains.len(),
        original.len()
    );
    Ok(resampled)
}

fn node_count(node_counts: &NodeCounts, chrom: &str) -> Result<u32> {
    node_counts
        .get(chrom)
        .copied()
        .ok_or_else(|| TadShuffleError::MissingNodeCount(chrom.to_string()))
}

/// Shuffle every chromosome in turn, all drawing from `rng`.
///
/// Chromosomes are visited in karyotypic order so a seeded `rng` gives the
/// same output on every run.
pub fn shuffle_all<R: Rng + ?Sized>(
    chrom_domains: &ChromDomains,
    node_counts: &NodeCounts,
    rng: &mut R,
    validate: bool,
) -> Result<ChromDomains> {
    let mut shuffled = ChromDomains::new();
    for chrom in chrom_domains.chromosomes() {
        let universe_size = node_count(node_counts, chrom)?;
        let resampled =
            shuffle_chromosome(chrom, &chrom_domains.domains[chrom], universe_size, rng, validate)?;
        shuffled.insert(chrom.clone(), resampled.domains);
    }
    Ok(shuffled)
}

/// Shuffle chromosomes in parallel. The `i`-th chromosome in karyotypic
/// order gets its own generator seeded with `seed + i`, so the result does
/// not depend on scheduling.
pub fn shuffle_all_par(
    chrom_domains: &ChromDomains,
    node_counts: &NodeCounts,
    seed: u64,
    validate: bool,
) -> Result<ChromDomains> {
    let chroms = chrom_domains.chromosomes();
    let results: Vec<(String, Vec<Domain>)> = chroms
        .into_par_iter()
        .enumerate()
        .map(|(idx, chrom)| -> Result<(String, Vec<Domain>)> {
            let universe_size = node_count(node_counts, chrom)?;
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(idx as u64));
            let resampled = shuffle_chromosome(
                chrom,
                &chrom_domains.domains[chrom],
                universe_size,
                &mut rng,
                validate,
            )?;
            Ok((chrom.clone(), resampled.domains))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(results.into_iter().collect())
}

/// Runs shuffles according to a [`ShuffleConfig`].
///
/// ```
/// use gtars_tadshuffle::{ChromDomains, NodeCounts, Segment, ShuffleConfig, TadShuffler};
///
/// let mut domains = ChromDomains::new();
/// domains.insert("chr1", vec![Segment::new(2, 4), Segment::new(8, 9)]);
/// let node_counts: NodeCounts = [("chr1".to_string(), 12)].into_iter().collect();
///
/// let shuffler = TadShuffler::new(ShuffleConfig {
///     seed: Some(42),
///     validate: true,
///     parallel: false,
/// });
/// let shuffled = shuffler.shuffle(&domains, &node_counts).unwrap();
/// assert_eq!(shuffled.get("chr1").unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TadShuffler {
    config: ShuffleConfig,
}

impl TadShuffler {
    pub fn new(config: ShuffleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ShuffleConfig {
        &self.config
    }

    pub fn shuffle(&self, chrom_domains: &ChromDomains, node_counts: &NodeCounts) -> Result<ChromDomains> {
        let seed = self.config.seed.unwrap_or_else(rand::random::<u64>);
        info!(
            "Shuffling domains on {} chromosomes (seed {}, validation {}, parallel {})",
            chrom_domains.len(),
            seed,
            if self.config.validate { "on" } else { "off" },
            self.config.parallel
        );

        if self.config.parallel {
            shuffle_all_par(chrom_domains, node_counts, seed, self.config.validate)
        } else {
            let mut rng = StdRng::seed_from_u64(seed);
            shuffle_all(chrom_domains, node_counts, &mut rng, self.config.validate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Invariant;
    use crate::models::Segment;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn segs(pairs: &[(u32, u32)]) -> Vec<Segment> {
        pairs.iter().map(|&p| Segment::from(p)).collect()
    }

    #[fixture]
    fn genome() -> (ChromDomains, NodeCounts) {
        let mut domains = ChromDomains::new();
        domains.insert("chr1", segs(&[(2, 4), (5, 9), (15, 20), (30, 31)]));
        domains.insert("chr2", segs(&[(1, 10), (11, 12)]));
        domains.insert("chrX", segs(&[(4, 4), (6, 6), (8, 8)]));
        domains.insert("chr3", vec![]);

        let node_counts: NodeCounts = [("chr1", 40), ("chr2", 12), ("chrX", 10), ("chr3", 5)]
            .into_iter()
            .map(|(c, n)| (c.to_string(), n))
            .collect();
        (domains, node_counts)
    }

    #[rstest]
    fn test_shuffle_preserves_length_distribution(genome: (ChromDomains, NodeCounts)) {
        let (domains, node_counts) = genome;
        for seed in 0..25 {
            let mut rng = StdRng::seed_from_u64(seed);
            let shuffled = shuffle_all(&domains, &node_counts, &mut rng, true).unwrap();

            for chrom in domains.chromosomes() {
                assert_eq!(
                    LengthDistribution::from_domains(shuffled.get(chrom).unwrap()),
                    LengthDistribution::from_domains(domains.get(chrom).unwrap())
                );
            }
        }
    }

    #[rstest]
    fn test_shuffle_is_deterministic(genome: (ChromDomains, NodeCounts)) {
        let (domains, node_counts) = genome;
        let a = shuffle_all(&domains, &node_counts, &mut StdRng::seed_from_u64(5), false).unwrap();
        let b = shuffle_all(&domains, &node_counts, &mut StdRng::seed_from_u64(5), false).unwrap();
        assert_eq!(a, b);
    }

    #[rstest]
    fn test_parallel_matches_itself_and_keeps_lengths(genome: (ChromDomains, NodeCounts)) {
        let (domains, node_counts) = genome;
        let a = shuffle_all_par(&domains, &node_counts, 17, true).unwrap();
        let b = shuffle_all_par(&domains, &node_counts, 17, true).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), domains.len());
    }

    #[rstest]
    fn test_parallel_matches_per_chromosome_seeding(genome: (ChromDomains, NodeCounts)) {
        let (domains, node_counts) = genome;
        let par = shuffle_all_par(&domains, &node_counts, 100, false).unwrap();

        for (idx, chrom) in domains.chromosomes().into_iter().enumerate() {
            let mut rng = StdRng::seed_from_u64(100 + idx as u64);
            let expected = shuffle_chromosome(
                chrom,
                domains.get(chrom).unwrap(),
                node_counts[chrom],
                &mut rng,
                false,
            )
            .unwrap();
            assert_eq!(par.get(chrom).unwrap(), &expected.domains);
        }
    }

    #[rstest]
    fn test_missing_node_count(genome: (ChromDomains, NodeCounts)) {
        let (mut domains, node_counts) = genome;
        domains.insert("chr9", segs(&[(1, 2)]));

        let err = shuffle_all(&domains, &node_counts, &mut StdRng::seed_from_u64(0), false)
            .unwrap_err();
        assert!(matches!(err, TadShuffleError::MissingNodeCount(c) if c == "chr9"));
    }

    #[rstest]
    fn test_overlapping_domains_fail_validation() {
        let err = shuffle_chromosome(
            "chr4",
            &segs(&[(1, 5), (4, 8)]),
            10,
            &mut StdRng::seed_from_u64(0),
            true,
        )
        .unwrap_err();

        match err {
            TadShuffleError::InvariantViolation { chrom, invariant, .. } => {
                assert_eq!(chrom, "chr4");
                assert_eq!(invariant, Invariant::Disjoint);
            }
            other => panic!("Expected invariant violation, got {:?}", other),
        }
    }

    #[rstest]
    fn test_domain_past_universe_fails_validation() {
        let result = shuffle_chromosome(
            "chr4",
            &segs(&[(3, 12)]),
            10,
            &mut StdRng::seed_from_u64(0),
            true,
        );
        assert!(matches!(
            result,
            Err(TadShuffleError::InvariantViolation {
                invariant: Invariant::Coverage,
                ..
            })
        ));
    }

    #[rstest]
    fn test_empty_chromosome() {
        let resampled =
            shuffle_chromosome("chr1", &[], 0, &mut StdRng::seed_from_u64(0), true).unwrap();
        assert!(resampled.domains.is_empty());

        let resampled =
            shuffle_chromosome("chr1", &[], 8, &mut StdRng::seed_from_u64(0), true).unwrap();
        assert!(resampled.domains.is_empty());
    }

    #[rstest]
    fn test_shuffler_from_config(genome: (ChromDomains, NodeCounts)) {
        let (domains, node_counts) = genome;
        let config = ShuffleConfig {
            seed: Some(8),
            validate: true,
            parallel: true,
        };
        let shuffler = TadShuffler::new(config);

        let a = shuffler.shuffle(&domains, &node_counts).unwrap();
        let b = shuffle_all_par(&domains, &node_counts, 8, false).unwrap();
        assert_eq!(a, b);
    }
}
