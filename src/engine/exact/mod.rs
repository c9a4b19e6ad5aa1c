//! Built-in exact-match reference engine.
//!
//! A deterministic engine pair used for end-to-end streaming without an
//! external aligner binding: hits are exact substring matches of the query
//! (or its reverse complement) against a FASTA-style reference. Useful for
//! demos and as the conformance target when validating custom backends.

mod batch;
mod loader;
mod sequential;

pub use batch::ExactBatchEngine;
pub use loader::ExactLoader;
pub use sequential::ExactEngine;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::engine::{Hit, IndexOptions, Strand};

const DEFAULT_MAX_HITS: usize = 8;

/// Errors native to the exact-match engine.
#[derive(Error, Debug)]
pub enum ExactError {
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "niffler")]
    #[error("compression error")]
    Niffler(#[from] niffler::Error),

    #[error("reference contains no sequence data")]
    EmptyReference,

    #[error("sequence data before first header at line {line}")]
    OrphanSequence { line: usize },

    #[error("unrecognised option `{key}`")]
    UnknownOption { key: String },

    #[error("option `{key}` must be a {expected}")]
    BadOption { key: String, expected: &'static str },

    #[error("worker pool size must be at least 1")]
    InvalidThreads,
}

#[derive(Debug)]
struct Target {
    name: String,
    seq: Vec<u8>,
}

/// Loaded reference for the exact-match engine.
///
/// Recognised options: `max_hits` (positive integer, default 8) caps the
/// number of hits reported per query. Any other key is rejected at load.
#[derive(Debug)]
pub struct ExactIndex {
    targets: Vec<Target>,
    max_hits: usize,
}

impl ExactIndex {
    /// Load a reference from a FASTA-style file path.
    ///
    /// Compressed files (gzip, zstd) are handled transparently when the
    /// `niffler` feature is enabled.
    pub fn from_path<P: AsRef<Path>>(path: P, options: &IndexOptions) -> Result<Self, ExactError> {
        let rdr = File::open(path).map(BufReader::new)?;

        #[cfg(feature = "niffler")]
        {
            let (pt, _format) = niffler::send::get_reader(Box::new(rdr))?;
            Self::from_reader(BufReader::new(pt), options)
        }
        #[cfg(not(feature = "niffler"))]
        {
            Self::from_reader(rdr, options)
        }
    }

    /// Load a reference from any buffered reader.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::io::Cursor;
    /// use mapstream::{ExactIndex, IndexOptions};
    ///
    /// let fasta = b">chr1\nACGTACGT\n>chr2\nTTTTAAAA\n";
    /// let index = ExactIndex::from_reader(Cursor::new(&fasta[..]), &IndexOptions::new()).unwrap();
    ///
    /// let hits = index.scan(b"ACGT");
    /// assert!(!hits.is_empty());
    /// ```
    pub fn from_reader<R: BufRead>(reader: R, options: &IndexOptions) -> Result<Self, ExactError> {
        let max_hits = parse_options(options)?;
        let mut targets: Vec<Target> = Vec::new();

        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(header) = line.strip_prefix('>') {
                let name = header.split_whitespace().next().unwrap_or("").to_string();
                targets.push(Target {
                    name,
                    seq: Vec::new(),
                });
            } else {
                match targets.last_mut() {
                    Some(target) => {
                        target
                            .seq
                            .extend(line.bytes().map(|b| b.to_ascii_uppercase()));
                    }
                    None => return Err(ExactError::OrphanSequence { line: lineno + 1 }),
                }
            }
        }

        if targets.iter().all(|t| t.seq.is_empty()) {
            return Err(ExactError::EmptyReference);
        }
        Ok(Self { targets, max_hits })
    }

    pub fn num_targets(&self) -> usize {
        self.targets.len()
    }

    /// Exact-match the query and its reverse complement against every
    /// target, reporting at most `max_hits` hits.
    pub fn scan(&self, query: &[u8]) -> Vec<Hit> {
        if query.is_empty() {
            return Vec::new();
        }
        let fwd = query.to_ascii_uppercase();
        let rev = revcomp(&fwd);

        let mut probes: Vec<(&[u8], Strand)> = vec![(fwd.as_slice(), Strand::Forward)];
        // A palindromic query matches identically on both strands; report it once.
        if rev != fwd {
            probes.push((rev.as_slice(), Strand::Reverse));
        }

        let mut hits = Vec::new();
        'scan: for target in &self.targets {
            for (needle, strand) in &probes {
                if needle.len() > target.seq.len() {
                    continue;
                }
                for at in 0..=target.seq.len() - needle.len() {
                    if &target.seq[at..at + needle.len()] == *needle {
                        hits.push(Hit {
                            target_name: target.name.clone(),
                            target_len: target.seq.len(),
                            target_start: at,
                            target_end: at + needle.len(),
                            query_start: 0,
                            query_end: query.len(),
                            strand: *strand,
                            mapq: 0,
                        });
                        if hits.len() == self.max_hits {
                            break 'scan;
                        }
                    }
                }
            }
        }
        if hits.len() == 1 {
            hits[0].mapq = 60;
        }
        hits
    }
}

fn parse_options(options: &IndexOptions) -> Result<usize, ExactError> {
    let mut max_hits = DEFAULT_MAX_HITS;
    for (key, value) in options.iter() {
        match key {
            "max_hits" => {
                let v = value.as_int().filter(|v| *v >= 1).ok_or_else(|| {
                    ExactError::BadOption {
                        key: key.to_string(),
                        expected: "positive integer",
                    }
                })?;
                max_hits = v as usize;
            }
            _ => {
                return Err(ExactError::UnknownOption {
                    key: key.to_string(),
                })
            }
        }
    }
    Ok(max_hits)
}

fn revcomp(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|b| match b {
            b'A' => b'T',
            b'T' => b'A',
            b'C' => b'G',
            b'G' => b'C',
            other => *other,
        })
        .collect()
}
