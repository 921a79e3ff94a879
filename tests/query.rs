use assert_matches::assert_matches;

use pepkb_snp::domain::VariantRecord;
use pepkb_snp::error::PepkbError;
use pepkb_snp::query::{RangeQuery, chromosome_range};

fn record(chromosome: &str, position: u64) -> VariantRecord {
    VariantRecord {
        chromosome: chromosome.to_string(),
        position,
        variant_id: format!("rs{position}"),
        reference_allele: "A".to_string(),
        alternate_alleles: vec!["G".to_string()],
        quality: 0.0,
    }
}

fn example_dataset() -> Vec<VariantRecord> {
    vec![record("Pn1", 100), record("Pn1", 500), record("Pn2", 300)]
}

#[test]
fn search_form_example_returns_single_match() {
    let dataset = example_dataset();
    let query = RangeQuery::new("pn1", 100, 400).unwrap();

    let result = query.filter(&dataset);

    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].chromosome, "Pn1");
    assert_eq!(result.records[0].position, 100);
    assert!(!result.no_results);
}

#[test]
fn filtering_is_idempotent() {
    let dataset = example_dataset();
    let query = RangeQuery::new("Pn1", 50, 600).unwrap();

    let once = query.filter(&dataset);
    let twice = query.filter(&once.records);

    assert_eq!(once, twice);
}

#[test]
fn chromosome_match_is_case_insensitive() {
    let dataset = example_dataset();

    let upper = RangeQuery::new("PN1", 0, 1_000).unwrap().filter(&dataset);
    let lower = RangeQuery::new("pn1", 0, 1_000).unwrap().filter(&dataset);

    assert_eq!(upper, lower);
    assert_eq!(upper.records.len(), 2);
}

#[test]
fn range_bounds_are_inclusive_at_both_ends() {
    let dataset = example_dataset();
    let query = RangeQuery::new("Pn1", 100, 500).unwrap();

    let result = query.filter(&dataset);

    let positions: Vec<u64> = result.records.iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![100, 500]);
}

#[test]
fn reversed_bounds_are_an_empty_result_not_an_error() {
    let dataset = example_dataset();

    let query = RangeQuery::new("pn1", 1000, 100).unwrap();
    let result = query.filter(&dataset);

    assert!(result.records.is_empty());
    assert!(result.no_results);
}

#[test]
fn parse_validates_before_any_filtering() {
    assert_matches!(
        RangeQuery::parse("", "100", "200"),
        Err(PepkbError::InvalidQuery(_))
    );
    assert_matches!(
        RangeQuery::parse("Pn1", "x", "200"),
        Err(PepkbError::InvalidQuery(_))
    );
    assert_matches!(
        RangeQuery::parse("Pn1", "100", "12.5"),
        Err(PepkbError::InvalidQuery(_))
    );

    let query = RangeQuery::parse(" Pn1 ", " 100 ", "200").unwrap();
    assert_eq!(query.chromosome, "Pn1");
    assert_eq!(query.start, 100);
    assert_eq!(query.end, 200);
}

#[test]
fn empty_dataset_filters_to_no_results() {
    let query = RangeQuery::new("Pn1", 0, 100).unwrap();
    let result = query.filter(&[]);
    assert!(result.no_results);
}

#[test]
fn chromosome_range_ignores_other_chromosomes() {
    let dataset = example_dataset();

    let range = chromosome_range(&dataset, "pn1").unwrap();
    assert_eq!(range.min_position, 100);
    assert_eq!(range.max_position, 500);

    let range = chromosome_range(&dataset, "Pn2").unwrap();
    assert_eq!(range.min_position, 300);
    assert_eq!(range.max_position, 300);

    assert!(chromosome_range(&dataset, "Pn3").is_none());
    assert!(chromosome_range(&dataset, "").is_none());
}
