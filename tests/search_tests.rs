//! Search resolution: local gates, exact lookups and the region scan

mod common;

use common::{record, StubSource};
use dexbrowser::catalog::Region;
use dexbrowser::error::BrowseError;
use dexbrowser::search;
use pretty_assertions::assert_eq;

fn result_ids(outcome: &search::SearchOutcome) -> Vec<u32> {
    outcome.records.iter().map(|record| record.id).collect()
}

#[tokio::test]
async fn out_of_region_id_fails_without_touching_source() {
    let source = StubSource::dex();

    let error = search::resolve(&source, "200", Region::Kanto)
        .await
        .unwrap_err();

    assert_eq!(error, BrowseError::out_of_region(200, Region::Kanto));
    assert_eq!(error.to_string(), "#200 is not in KANTO: try #1-151");
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn huge_number_is_out_of_region() {
    let source = StubSource::dex();
    let error = search::resolve(&source, "99999999999", Region::Johto)
        .await
        .unwrap_err();
    assert!(matches!(error, BrowseError::OutOfRegion { region: Region::Johto, .. }));
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn invalid_characters_fail_validation() {
    let source = StubSource::dex();
    let error = search::resolve(&source, "pika!", Region::Kanto)
        .await
        .unwrap_err();
    assert!(matches!(error, BrowseError::Validation { .. }));
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn numeric_id_in_region_is_fetched_directly() {
    let source = StubSource::dex();
    let outcome = search::resolve(&source, " 025 ", Region::Kanto).await.unwrap();

    assert_eq!(result_ids(&outcome), vec![25]);
    assert_eq!(source.by_id_calls(), vec![25]);
}

#[tokio::test]
async fn long_name_scans_region_in_order() {
    let source = StubSource::dex();

    let outcome = search::resolve(&source, "Char", Region::Kanto).await.unwrap();

    assert_eq!(result_ids(&outcome), vec![4, 5, 6]);
    assert_eq!(outcome.query, "Char");
    assert!(source.by_name_calls().is_empty());
    assert_eq!(source.by_id_calls(), (1..=151).collect::<Vec<_>>());
}

#[tokio::test]
async fn scan_skips_failing_ids() {
    let source = StubSource::dex().failing(5).offline(6);
    let outcome = search::resolve(&source, "char", Region::Kanto).await.unwrap();
    assert_eq!(result_ids(&outcome), vec![4]);
    // A dropped connection does not end the scan early.
    assert_eq!(source.by_id_calls(), (1..=151).collect::<Vec<_>>());
}

#[tokio::test]
async fn scan_with_no_match_is_not_found() {
    let source = StubSource::dex();
    let error = search::resolve(&source, "zzzz", Region::Hoenn)
        .await
        .unwrap_err();
    assert_eq!(
        error,
        BrowseError::NotFound {
            query: "zzzz".into()
        }
    );
    assert_eq!(source.by_id_calls(), (252..=386).collect::<Vec<_>>());
}

#[tokio::test]
async fn short_name_exact_hit_skips_scan() {
    let source = StubSource::dex().with_record(record(122, "mu"));

    let outcome = search::resolve(&source, "MU", Region::Kanto).await.unwrap();

    assert_eq!(result_ids(&outcome), vec![122]);
    assert_eq!(source.by_name_calls(), vec!["mu".to_string()]);
    assert!(source.by_id_calls().is_empty());
}

#[tokio::test]
async fn short_name_miss_falls_back_to_scan() {
    let source = StubSource::dex();

    let outcome = search::resolve(&source, "ev", Region::Kanto).await.unwrap();

    assert_eq!(result_ids(&outcome), vec![133]);
    assert_eq!(source.by_name_calls(), vec!["ev".to_string()]);
    assert_eq!(source.by_id_calls().len(), 151);
}

#[tokio::test]
async fn short_name_hit_outside_region_is_rejected() {
    let source = StubSource::dex().with_record(record(200, "zz"));

    let error = search::resolve(&source, "zz", Region::Kanto)
        .await
        .unwrap_err();

    assert_eq!(error, BrowseError::out_of_region(200, Region::Kanto));
    assert!(source.by_id_calls().is_empty());
}
