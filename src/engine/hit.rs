use std::fmt;

/// Strand of a mapping hit relative to the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strand {
    Forward,
    Reverse,
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

/// One mapping result for a sequence against the reference.
///
/// Field meanings follow PAF conventions. The streaming core treats hits as
/// opaque cargo: it forwards the lists an engine produces and never reads the
/// fields itself.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hit {
    /// Name of the target contig/chromosome.
    pub target_name: String,
    /// Total length of the target sequence.
    pub target_len: usize,
    /// Start of the match on the target (0-based, inclusive).
    pub target_start: usize,
    /// End of the match on the target (0-based, exclusive).
    pub target_end: usize,
    /// Start of the match on the query (0-based, inclusive).
    pub query_start: usize,
    /// End of the match on the query (0-based, exclusive).
    pub query_end: usize,
    /// Strand the query matched on.
    pub strand: Strand,
    /// Mapping quality, 0-60.
    pub mapq: u8,
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.query_start,
            self.query_end,
            self.strand,
            self.target_name,
            self.target_len,
            self.target_start,
            self.target_end,
            self.mapq,
        )
    }
}
