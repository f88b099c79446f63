use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, TadShuffleError};
use crate::utils::chrom_karyotype_key;

///
/// Closed, 1-based interval `[start, end]` over the segment indices of a chromosome.
///
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Clone, Copy)]
pub struct Segment {
    pub start: u32,
    pub end: u32,
}

/// A labeled TAD region. Domains of one chromosome never overlap but need
/// not cover the whole chromosome.
pub type Domain = Segment;

impl Segment {
    pub fn new(start: u32, end: u32) -> Self {
        Segment { start, end }
    }

    /// Build a segment, rejecting `start < 1` and `start > end`.
    pub fn try_new(start: i64, end: i64) -> Result<Self> {
        if start < 1 || start > end || end > u32::MAX as i64 {
            return Err(TadShuffleError::InvalidSegment { start, end });
        }
        Ok(Segment {
            start: start as u32,
            end: end as u32,
        })
    }

    ///
    /// Number of positions covered, `end - start + 1`
    ///
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Always false for a well formed segment; kept for the `len`/`is_empty` pair.
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn overlaps(&self, other: &Segment) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Positions covered by this segment.
    pub fn positions(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.start, self.end)
    }
}

impl From<(u32, u32)> for Segment {
    fn from(value: (u32, u32)) -> Self {
        Segment::new(value.0, value.1)
    }
}

/// A set of segments that are meant to tile `[1, universe_size]` exactly.
///
/// Segments are kept sorted by start. Construction does not check the
/// tiling; see [`crate::validate`] for that.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FullPartition {
    pub universe_size: u32,
    pub segments: Vec<Segment>,
}

impl FullPartition {
    pub fn new(universe_size: u32, mut segments: Vec<Segment>) -> Self {
        segments.sort_unstable();
        FullPartition {
            universe_size,
            segments,
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of segment lengths.
    pub fn total_length(&self) -> u64 {
        self.segments.iter().map(|s| s.len() as u64).sum()
    }

    /// Segment lengths sorted ascending, i.e. the length multiset.
    pub fn sorted_lengths(&self) -> Vec<u32> {
        let mut lens: Vec<u32> = self.segments.iter().map(Segment::len).collect();
        lens.sort_unstable();
        lens
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }
}

/// Histogram of domain lengths: length -> number of domains with that length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LengthDistribution {
    counts: BTreeMap<u32, usize>,
}

impl LengthDistribution {
    pub fn from_domains(domains: &[Domain]) -> Self {
        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for domain in domains {
            *counts.entry(domain.len()).or_insert(0) += 1;
        }
        LengthDistribution { counts }
    }

    /// Number of domains of `length`, zero if absent.
    pub fn count(&self, length: u32) -> usize {
        self.counts.get(&length).copied().unwrap_or(0)
    }

    pub fn contains(&self, length: u32) -> bool {
        self.counts.contains_key(&length)
    }

    /// Iterate `(length, count)` pairs in ascending length order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.counts.iter().map(|(l, c)| (*l, *c))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of domains counted.
    pub fn domain_count(&self) -> usize {
        self.counts.values().sum()
    }

    /// Sum over lengths of `length * count`.
    pub fn total_length(&self) -> u64 {
        self.counts
            .iter()
            .map(|(l, c)| *l as u64 * *c as u64)
            .sum()
    }
}

impl FromIterator<(u32, usize)> for LengthDistribution {
    fn from_iter<I: IntoIterator<Item = (u32, usize)>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        for (length, count) in iter {
            *counts.entry(length).or_insert(0) += count;
        }
        LengthDistribution { counts }
    }
}

/// Chromosome identifier -> universe size (number of indexable segments).
pub type NodeCounts = HashMap<String, u32>;

/// Chromosome identifier -> domains on that chromosome.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChromDomains {
    pub domains: HashMap<String, Vec<Domain>>,
}

impl ChromDomains {
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Pair parsed domain groups with chromosome names, in order. Extra
    /// groups or names beyond the shorter of the two are ignored.
    ///
    pub fn from_groups<S: AsRef<str>>(groups: Vec<Vec<Domain>>, names: &[S]) -> Self {
        let domains = names
            .iter()
            .zip(groups)
            .map(|(name, group)| (name.as_ref().to_string(), group))
            .collect();
        ChromDomains { domains }
    }

    pub fn insert(&mut self, chrom: impl Into<String>, domains: Vec<Domain>) {
        self.domains.insert(chrom.into(), domains);
    }

    pub fn get(&self, chrom: &str) -> Option<&Vec<Domain>> {
        self.domains.get(chrom)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Chromosome names in karyotypic order (1..22, X, Y, M, then the rest).
    pub fn chromosomes(&self) -> Vec<&String> {
        let mut chroms: Vec<&String> = self.domains.keys().collect();
        chroms.sort_by(|a, b| {
            chrom_karyotype_key(a)
                .cmp(&chrom_karyotype_key(b))
                .then_with(|| a.cmp(b))
        });
        chroms
    }
}

impl FromIterator<(String, Vec<Domain>)> for ChromDomains {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Domain>)>>(iter: I) -> Self {
        ChromDomains {
            domains: iter.into_iter().collect(),
        }
    }
}

/// Options for a shuffle run.
///
/// # Example
/// ```toml
/// seed = 42
/// validate = true
/// parallel = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ShuffleConfig {
    /// Base seed. Without one the generator is seeded from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Check partition invariants after each stage.
    #[serde(default)]
    pub validate: bool,
    /// Shuffle chromosomes on the rayon pool.
    #[serde(default)]
    pub parallel: bool,
}

impl ShuffleConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| TadShuffleError::ConfigError(e.to_string()))
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TadShuffleError::ConfigError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
