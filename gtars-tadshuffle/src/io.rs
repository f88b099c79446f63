//! Readers and writers for the domain and contact-matrix text formats.
//!
//! Domain files hold one `start,end` record per line (1-based, inclusive),
//! with chromosomes separated by blank lines. Contact-frequency matrices
//! hold one tab-separated row per node: `name start end value...`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::errors::{Result, TadShuffleError};
use crate::models::{ChromDomains, Domain, NodeCounts, Segment};
use crate::utils::get_dynamic_reader;

/// One row header of a contact-frequency matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreqNode {
    pub name: String,
    pub start: u64,
    pub end: u64,
}

fn parse_domain_line(line: &str, line_no: usize) -> Result<Domain> {
    let parse_err = || TadShuffleError::RecordParseError {
        line: line_no,
        content: line.to_string(),
    };
    let mut fields = line.split(',');
    let start = fields
        .next()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .ok_or_else(parse_err)?;
    let end = fields
        .next()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .ok_or_else(parse_err)?;
    Segment::try_new(start, end)
}

///
/// Read a domain file into one group of domains per chromosome.
///
/// A blank line closes the current group. The group after the last blank
/// line is always returned, so a file ending in a blank line yields a
/// trailing empty group. `.gz` files are decompressed on the fly.
///
pub fn read_domain_file<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<Domain>>> {
    let reader = get_dynamic_reader(path.as_ref())?;

    let mut groups: Vec<Vec<Domain>> = Vec::new();
    let mut current: Vec<Domain> = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            groups.push(std::mem::take(&mut current));
            continue;
        }
        current.push(parse_domain_line(line, idx + 1)?);
    }
    groups.push(current);

    Ok(groups)
}

/// Number of rows of a contact-frequency matrix, i.e. the number of
/// indexable segments of its chromosome.
pub fn read_freq_matrix_size<P: AsRef<Path>>(path: P) -> Result<u32> {
    let reader = get_dynamic_reader(path.as_ref())?;
    let mut count: u32 = 0;
    for line in reader.lines() {
        line?;
        count += 1;
    }
    Ok(count)
}

/// Row headers (name, genomic start, genomic end) of a contact-frequency
/// matrix. Matrix values are not parsed. Row `i` corresponds to segment
/// index `i + 1`.
pub fn read_freq_nodes<P: AsRef<Path>>(path: P) -> Result<Vec<FreqNode>> {
    let reader = get_dynamic_reader(path.as_ref())?;
    let mut nodes = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let mut fields = line.trim_end().split('\t');
        let parse_err = || TadShuffleError::RecordParseError {
            line: idx + 1,
            content: line.clone(),
        };
        let name = fields.next().ok_or_else(parse_err)?.to_string();
        let start = fields
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(parse_err)?;
        let end = fields
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(parse_err)?;
        nodes.push(FreqNode { name, start, end });
    }
    Ok(nodes)
}

/// Node count of each chromosome from its contact-frequency matrix file.
pub fn node_counts_from_freq_files<P: AsRef<Path>>(files: &HashMap<String, P>) -> Result<NodeCounts> {
    files
        .iter()
        .map(|(chrom, path)| Ok((chrom.clone(), read_freq_matrix_size(path)?)))
        .collect()
}

pub trait DomainWrite {
    ///
    /// Write domains to disk in the blank-line separated `start,end` format
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    fn write_domains<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()>;

    ///
    /// Write domains to disk as a gzipped domain file
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    fn write_domains_gz<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()>;
}

impl ChromDomains {
    /// Chromosomes in karyotypic order, each group sorted by start, one
    /// record per line and a blank line between chromosomes.
    fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for (idx, chrom) in self.chromosomes().into_iter().enumerate() {
            if idx > 0 {
                writeln!(out)?;
            }
            let mut domains = self.domains[chrom].clone();
            domains.sort_unstable();
            for domain in &domains {
                writeln!(out, "{}", domain)?;
            }
        }
        Ok(())
    }
}

impl DomainWrite for ChromDomains {
    fn write_domains<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = BufWriter::new(File::create(path)?);
        self.write_to(&mut file)?;
        file.flush()
    }

    fn write_domains_gz<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::best());
        self.write_to(&mut encoder)?;
        encoder.finish()?.flush()
    }
}
