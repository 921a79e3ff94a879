use serde::Serialize;

use crate::domain::{ChromosomeRange, VariantRecord, same_chromosome};
use crate::error::PepkbError;

/// Validated chromosome/position-range query.
///
/// `start > end` is deliberately not rejected: reversed bounds are a
/// well-defined query that matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeQuery {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
}

impl RangeQuery {
    pub fn new(chromosome: impl Into<String>, start: u64, end: u64) -> Result<Self, PepkbError> {
        let chromosome = chromosome.into();
        if chromosome.trim().is_empty() {
            return Err(PepkbError::InvalidQuery(
                "chromosome must not be empty".to_string(),
            ));
        }
        Ok(Self {
            chromosome,
            start,
            end,
        })
    }

    /// Builds a query from raw form-style text inputs, the shape the search
    /// form submits. Callers must refuse to run a query that fails here.
    pub fn parse(chromosome: &str, start: &str, end: &str) -> Result<Self, PepkbError> {
        let start = parse_bound("start", start)?;
        let end = parse_bound("end", end)?;
        Self::new(chromosome.trim().to_string(), start, end)
    }

    /// Pure filter over a dataset snapshot: case-insensitive chromosome match
    /// and `start <= position <= end`, inclusive at both ends. Idempotent for
    /// an unchanged snapshot.
    pub fn filter(&self, records: &[VariantRecord]) -> QueryResult {
        let matches: Vec<VariantRecord> = records
            .iter()
            .filter(|record| {
                same_chromosome(&record.chromosome, &self.chromosome)
                    && record.position >= self.start
                    && record.position <= self.end
            })
            .cloned()
            .collect();
        let no_results = matches.is_empty();
        QueryResult {
            records: matches,
            no_results,
        }
    }
}

/// Outcome of an executed filter. `no_results` is true exactly when a filter
/// ran and matched nothing; "no filter has run yet" is instead the absence
/// of a `QueryResult`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub records: Vec<VariantRecord>,
    pub no_results: bool,
}

/// Min/max observed position for `chromosome` within `records`, or `None`
/// when the name is blank or nothing matches. A derived view: recompute when
/// the selection or dataset changes, O(n) per call.
pub fn chromosome_range(records: &[VariantRecord], chromosome: &str) -> Option<ChromosomeRange> {
    if chromosome.trim().is_empty() {
        return None;
    }
    let mut bounds: Option<(u64, u64)> = None;
    for record in records {
        if !same_chromosome(&record.chromosome, chromosome) {
            continue;
        }
        bounds = Some(match bounds {
            Some((min, max)) => (min.min(record.position), max.max(record.position)),
            None => (record.position, record.position),
        });
    }
    bounds.map(|(min_position, max_position)| ChromosomeRange {
        chromosome: chromosome.to_string(),
        min_position,
        max_position,
    })
}

fn parse_bound(field: &str, raw: &str) -> Result<u64, PepkbError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| PepkbError::InvalidQuery(format!("{field} position is not a valid integer: {raw}")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn record(chromosome: &str, position: u64) -> VariantRecord {
        VariantRecord {
            chromosome: chromosome.to_string(),
            position,
            variant_id: String::new(),
            reference_allele: "A".to_string(),
            alternate_alleles: vec!["T".to_string()],
            quality: 0.0,
        }
    }

    #[test]
    fn parse_rejects_blank_chromosome() {
        let err = RangeQuery::parse("  ", "100", "200").unwrap_err();
        assert_matches!(err, PepkbError::InvalidQuery(_));
    }

    #[test]
    fn parse_rejects_non_numeric_bounds() {
        let err = RangeQuery::parse("Pn1", "abc", "200").unwrap_err();
        assert_matches!(err, PepkbError::InvalidQuery(_));
        let err = RangeQuery::parse("Pn1", "100", "").unwrap_err();
        assert_matches!(err, PepkbError::InvalidQuery(_));
    }

    #[test]
    fn range_is_none_for_blank_or_unknown_chromosome() {
        let records = vec![record("Pn1", 100)];
        assert_eq!(chromosome_range(&records, ""), None);
        assert_eq!(chromosome_range(&records, "Pn9"), None);
    }

    #[test]
    fn range_spans_min_and_max() {
        let records = vec![record("Pn1", 500), record("pn1", 100), record("Pn2", 300)];
        let range = chromosome_range(&records, "Pn1").unwrap();
        assert_eq!(range.min_position, 100);
        assert_eq!(range.max_position, 500);
    }
}
