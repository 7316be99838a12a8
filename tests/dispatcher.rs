// Integration tests for the parallel dispatcher.
//
// Completion order is scrambled with per-record sleeps so that workers finish
// out of sequence; output must still follow input order.

use std::thread;
use std::time::Duration;

use postlens::dispatcher::{analyze_all, analyze_all_with, DispatchConfig, Strictness};
use postlens::{analyze, PipelineError, Record};

fn records(ids: &[i64]) -> Vec<Record> {
    ids.iter()
        .map(|&id| Record::new(id, format!("Title {id}"), format!("body of record {id}")))
        .collect()
}

fn config(workers: usize, strictness: Strictness) -> DispatchConfig {
    DispatchConfig {
        workers: Some(workers),
        strictness,
    }
}

// ============================================================
// Order preservation
// ============================================================

#[test]
fn output_follows_input_order_under_jitter() {
    let input = records(&[5, 2, 9, 1]);
    // Earlier records sleep longer, so they finish last
    let batch = analyze_all_with(&input, &config(4, Strictness::Strict), |record| {
        let delay = match record.id {
            5 => 60,
            2 => 40,
            9 => 20,
            _ => 0,
        };
        thread::sleep(Duration::from_millis(delay));
        analyze(record)
    })
    .unwrap();

    let ids: Vec<i64> = batch.results.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![5, 2, 9, 1]);
    assert!(batch.skipped.is_empty());
}

#[test]
fn many_records_keep_their_positions() {
    let ids: Vec<i64> = (0..200).map(|i| (i * 37) % 211).collect();
    let input = records(&ids);
    let batch = analyze_all_with(&input, &config(8, Strictness::Strict), |record| {
        thread::sleep(Duration::from_micros((record.id % 7) as u64 * 100));
        analyze(record)
    })
    .unwrap();

    let out: Vec<i64> = batch.results.iter().map(|r| r.id).collect();
    assert_eq!(out, ids);
}

#[test]
fn parallel_results_match_sequential_analysis() {
    let input = records(&[3, 1, 4, 1, 5, 9, 2, 6]);
    let batch = analyze_all(&input, &DispatchConfig::default()).unwrap();
    let sequential: Vec<_> = input.iter().map(|r| analyze(r).unwrap()).collect();
    assert_eq!(batch.results, sequential);
}

// ============================================================
// Failure handling
// ============================================================

fn with_missing_body(ids: &[i64], broken: i64) -> Vec<Record> {
    let mut input = records(ids);
    for record in &mut input {
        if record.id == broken {
            record.body = None;
        }
    }
    input
}

#[test]
fn strict_mode_fails_whole_batch_with_record_id() {
    let input = with_missing_body(&[10, 20, 30], 20);
    let err = analyze_all(&input, &config(2, Strictness::Strict)).unwrap_err();
    assert_eq!(err.record_id(), Some(20));
    assert!(matches!(
        err,
        PipelineError::InvalidRecord { field: "body", .. }
    ));
}

#[test]
fn strict_mode_reports_earliest_failure() {
    let mut input = with_missing_body(&[1, 2, 3, 4], 4);
    input[1].title = None;
    // Make the later failure finish first
    let err = analyze_all_with(&input, &config(4, Strictness::Strict), |record| {
        if record.id == 2 {
            thread::sleep(Duration::from_millis(50));
        }
        analyze(record)
    })
    .unwrap_err();
    assert_eq!(err.record_id(), Some(2));
}

#[test]
fn lenient_mode_skips_and_reports() {
    let input = with_missing_body(&[7, 8, 9], 8);
    let batch = analyze_all(&input, &config(3, Strictness::Lenient)).unwrap();

    let ids: Vec<i64> = batch.results.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![7, 9]);
    assert_eq!(batch.skipped.len(), 1);
    assert_eq!(batch.skipped[0].id, 8);
    assert!(matches!(
        batch.skipped[0].error,
        PipelineError::InvalidRecord { id: 8, .. }
    ));
}

#[test]
fn no_result_is_dropped_or_duplicated() {
    let input = records(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    let batch = analyze_all(&input, &config(3, Strictness::Lenient)).unwrap();
    assert_eq!(batch.results.len(), input.len());
    let ids: Vec<i64> = batch.results.iter().map(|r| r.id).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<i64>>());
    assert!(batch.skipped.is_empty());
}
