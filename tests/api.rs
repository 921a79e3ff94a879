use pepkb_snp::api::{StudyLookupEntry, VariantPage, normalize_page};

#[test]
fn page_envelope_deserializes_feed_shape() {
    let body = r#"{
        "data": [
            { "CHROM": "Pn1", "POS": 1042, "variant_id": "rs42", "REF": "G", "ALT": "A" },
            { "CHROM": "Pn2", "POS": "77", "variant_id": "", "REF": "C", "ALT": "T" }
        ],
        "pagination": { "currentPage": 1, "totalPages": 4 }
    }"#;

    let page: VariantPage = serde_json::from_str(body).unwrap();
    assert_eq!(page.pagination.current_page, 1);
    assert_eq!(page.pagination.total_pages, 4);

    let normalized = normalize_page(&page.data);
    assert_eq!(normalized.rejected, 0);
    assert_eq!(normalized.records.len(), 2);

    let first = &normalized.records[0];
    assert_eq!(first.chromosome, "Pn1");
    assert_eq!(first.position, 1042);
    assert_eq!(first.variant_id, "rs42");
    assert_eq!(first.reference_allele, "G");
    assert_eq!(first.alternate_alleles, vec!["A".to_string()]);
    assert_eq!(first.quality, 0.0);

    // Numeric-string positions parse too.
    assert_eq!(normalized.records[1].position, 77);
}

#[test]
fn malformed_position_rejects_only_that_record() {
    let body = r#"{
        "data": [
            { "CHROM": "Pn1", "POS": "not-a-number", "variant_id": "rs1", "REF": "G", "ALT": "A" },
            { "CHROM": "Pn1", "POS": null, "variant_id": "rs2", "REF": "G", "ALT": "A" },
            { "CHROM": "Pn1", "POS": 9, "variant_id": "rs3", "REF": "G", "ALT": "A" }
        ],
        "pagination": { "currentPage": 1, "totalPages": 1 }
    }"#;

    let page: VariantPage = serde_json::from_str(body).unwrap();
    let normalized = normalize_page(&page.data);

    assert_eq!(normalized.rejected, 2);
    assert_eq!(normalized.records.len(), 1);
    assert_eq!(normalized.records[0].variant_id, "rs3");
}

#[test]
fn missing_optional_fields_default_to_empty() {
    let body = r#"{
        "data": [ { "CHROM": "Pn1", "POS": 5 } ],
        "pagination": { "currentPage": 1, "totalPages": 1 }
    }"#;

    let page: VariantPage = serde_json::from_str(body).unwrap();
    let normalized = normalize_page(&page.data);

    let record = &normalized.records[0];
    assert!(record.variant_id.is_empty());
    assert!(record.reference_allele.is_empty());
    assert_eq!(record.alternate_alleles, vec![String::new()]);
}

#[test]
fn lookup_entry_accepts_numeric_or_string_study_id() {
    let numeric: StudyLookupEntry =
        serde_json::from_str(r#"{ "study_id": 12, "study_name": "gwas" }"#).unwrap();
    assert_eq!(numeric.study_id, "12");

    let text: StudyLookupEntry =
        serde_json::from_str(r#"{ "study_id": "s-12", "study_name": "gwas" }"#).unwrap();
    assert_eq!(text.study_id, "s-12");
}
