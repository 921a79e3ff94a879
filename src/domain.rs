use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned study identifier. Opaque: the API may emit it as a JSON
/// number or string, it is normalized to a string and never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudyId(String);

impl StudyId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resolved study. Immutable after resolution; replaced wholesale when the
/// selected study name changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Study {
    pub id: StudyId,
    pub name: String,
}

/// One SNP marker row of a study dataset.
///
/// `chromosome` keeps the case the server sent for display; all comparisons go
/// through [`same_chromosome`]. `quality` is vestigial: the upstream feed
/// carries no quality score, so the normalizer always writes `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantRecord {
    pub chromosome: String,
    pub position: u64,
    pub variant_id: String,
    pub reference_allele: String,
    pub alternate_alleles: Vec<String>,
    pub quality: f64,
}

impl VariantRecord {
    /// Alternate alleles joined for display, e.g. `"A,T"`.
    pub fn alternate_display(&self) -> String {
        self.alternate_alleles.join(",")
    }
}

/// Observed position bounds of one chromosome within a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChromosomeRange {
    pub chromosome: String,
    pub min_position: u64,
    pub max_position: u64,
}

/// Chromosome names compare case-insensitively everywhere (`Pn1` == `pn1`).
pub fn same_chromosome(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
