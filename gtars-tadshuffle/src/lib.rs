//! Length-preserving shuffles of chromosome domain (TAD) segmentations.
//!
//! Given the domains called on each chromosome and the number of indexable
//! segments per chromosome, this crate produces randomized control domains
//! with the same per-length domain counts, for use as a null model when
//! testing domain boundaries:
//!
//! - [`partition::complete_partition`] fills the gaps between domains so the
//!   chromosome is tiled exactly
//! - [`randomize::randomize`] permutes the tile lengths and lays them out again
//! - [`resample::resample`] picks, per length, as many tiles as there were
//!   original domains of that length
//! - [`shuffle`] runs the three steps per chromosome, sequentially or on rayon
//! - [`validate`] holds the partition invariant checks used in validation mode
//!
//! # Example
//!
//! ```no_run
//! use gtars_tadshuffle::io::{read_domain_file, read_freq_matrix_size, DomainWrite};
//! use gtars_tadshuffle::{ChromDomains, NodeCounts, ShuffleConfig, TadShuffler};
//!
//! let groups = read_domain_file("tads/1.domains").unwrap();
//! let domains = ChromDomains::from_groups(groups, &["1"]);
//!
//! let mut node_counts = NodeCounts::new();
//! node_counts.insert("1".to_string(), read_freq_matrix_size("normalized/1.freq.gz").unwrap());
//!
//! let shuffler = TadShuffler::new(ShuffleConfig::from_file("shuffle.toml").unwrap());
//! let shuffled = shuffler.shuffle(&domains, &node_counts).unwrap();
//! shuffled.write_domains("shuffled/1.domains").unwrap();
//! ```

pub mod errors;
pub mod io;
pub mod models;
pub mod partition;
pub mod randomize;
pub mod resample;
pub mod shuffle;
pub mod utils;
pub mod validate;

// re-exports
pub use errors::{Invariant, Result, TadShuffleError};
pub use models::{
    ChromDomains, Domain, FullPartition, LengthDistribution, NodeCounts, Segment, ShuffleConfig,
};
pub use partition::complete_partition;
pub use randomize::{lay_out, randomize};
pub use resample::{Resampled, Underfill, resample};
pub use shuffle::{TadShuffler, shuffle_all, shuffle_all_par, shuffle_chromosome};
