use std::fmt::{self, Display};

use thiserror::Error;

/// Partition invariant checked by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invariant {
    /// No two segments of a partition share a position.
    Disjoint,
    /// The partition covers every position of the universe and nothing else.
    Coverage,
    /// Total length of the randomized partition equals the universe size.
    RandomizedLength,
    /// Summed length of resampled domains equals that of the original domains.
    DomainLength,
    /// The randomized layout touches every position of the universe exactly once.
    RandomizedCoverage,
}

impl Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Invariant::Disjoint => "segments are pairwise disjoint",
            Invariant::Coverage => "segments cover the universe exactly",
            Invariant::RandomizedLength => "randomized partition length equals universe size",
            Invariant::DomainLength => "resampled domain length equals original domain length",
            Invariant::RandomizedCoverage => "randomized layout covers the universe exactly",
        };
        write!(f, "{}", name)
    }
}

#[derive(Error, Debug)]
pub enum TadShuffleError {
    #[error("Invariant violated on chromosome {chrom}: {invariant} ({detail})")]
    InvariantViolation {
        chrom: String,
        invariant: Invariant,
        detail: String,
    },

    #[error("No node count for chromosome: {0}")]
    MissingNodeCount(String),

    #[error("Can't parse record on line {line}: {content}")]
    RecordParseError { line: usize, content: String },

    #[error("Invalid segment [{start}, {end}]")]
    InvalidSegment { start: i64, end: i64 },

    #[error("Can't read config: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TadShuffleError>;
