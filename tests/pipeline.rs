// End-to-end pipeline tests with in-memory collaborators.

use postlens::dispatcher::Strictness;
use postlens::error::Result as PipelineResult;
use postlens::pipeline::{run_with, PipelineConfig};
use postlens::renderer::{ChartRenderer, Image, SvgRenderer};
use postlens::writer::{DocumentWriter, FileWriter, StreamWriter};
use postlens::{Document, FrequencyMap, PipelineError, Record, RenderError};

struct StaticFetcher(Vec<Record>);

impl postlens::fetcher::SourceFetcher for StaticFetcher {
    fn fetch(&self, n: usize) -> PipelineResult<Vec<Record>> {
        Ok(self.0.iter().take(n).cloned().collect())
    }
}

struct FailingFetcher;

impl postlens::fetcher::SourceFetcher for FailingFetcher {
    fn fetch(&self, _n: usize) -> PipelineResult<Vec<Record>> {
        Err(PipelineError::Fetch {
            url: "http://source.invalid".to_string(),
            reason: "unreachable".to_string(),
        })
    }
}

/// Fails every word cloud, draws every bar chart.
struct NoClouds;

impl ChartRenderer for NoClouds {
    fn render_wordcloud(&self, _freq: &FrequencyMap) -> Result<Image, RenderError> {
        Err(RenderError::Backend {
            chart: "word cloud",
            reason: "no fonts".to_string(),
        })
    }

    fn render_bar_chart(&self, freq: &FrequencyMap, top_k: usize) -> Result<Image, RenderError> {
        SvgRenderer::default().render_bar_chart(freq, top_k)
    }
}

/// Captures the document instead of writing it.
#[derive(Default)]
struct Capture {
    document: Option<Document>,
    writes: usize,
}

impl DocumentWriter for Capture {
    fn write(&mut self, document: &Document) -> PipelineResult<()> {
        self.writes += 1;
        self.document = Some(document.clone());
        Ok(())
    }
}

fn posts() -> Vec<Record> {
    vec![
        Record::new(1, "The Fox", "the fox jumps"),
        Record::new(2, "Lazy dog", "a lazy dog sleeps all day"),
        Record::new(3, "Quick brown", "quick quick brown brown brown"),
    ]
}

fn config(count: usize) -> PipelineConfig {
    PipelineConfig {
        count,
        ..Default::default()
    }
}

#[test]
fn sections_follow_fetch_order() {
    let mut capture = Capture::default();
    let summary = run_with(
        &StaticFetcher(posts()),
        &SvgRenderer::default(),
        &mut capture,
        &config(3),
    )
    .unwrap();

    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.analyzed, 3);
    assert_eq!(summary.placeholders, 0);
    assert_eq!(capture.writes, 1);

    let document = capture.document.unwrap();
    let ids: Vec<i64> = document.sections.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(document.sections[0].common, vec!["fox", "the"]);
    assert_eq!(document.sections[0].unique_body, vec!["jumps"]);
}

#[test]
fn count_limits_records() {
    let mut capture = Capture::default();
    let summary = run_with(
        &StaticFetcher(posts()),
        &SvgRenderer::default(),
        &mut capture,
        &config(2),
    )
    .unwrap();
    assert_eq!(summary.analyzed, 2);
    assert_eq!(capture.document.unwrap().sections.len(), 2);
}

#[test]
fn empty_source_produces_zero_sections() {
    let mut capture = Capture::default();
    let summary = run_with(
        &StaticFetcher(Vec::new()),
        &SvgRenderer::default(),
        &mut capture,
        &config(5),
    )
    .unwrap();
    assert_eq!(summary.analyzed, 0);
    assert!(capture.document.unwrap().sections.is_empty());
}

#[test]
fn fetch_failure_writes_nothing() {
    let mut capture = Capture::default();
    let err = run_with(&FailingFetcher, &SvgRenderer::default(), &mut capture, &config(5))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::Fetch { .. })
    ));
    assert_eq!(capture.writes, 0);
}

#[test]
fn invalid_record_fails_strict_run_before_writing() {
    let mut input = posts();
    input[2].body = None;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.html");

    let err = run_with(
        &StaticFetcher(input),
        &SvgRenderer::default(),
        &mut FileWriter::new(&path),
        &config(3),
    )
    .unwrap_err();

    match err.downcast_ref::<PipelineError>() {
        Some(e @ PipelineError::InvalidRecord { .. }) => assert_eq!(e.record_id(), Some(3)),
        other => panic!("expected InvalidRecord, got {other:?}"),
    }
    assert!(!path.exists());
}

#[test]
fn lenient_run_reports_skipped_records() {
    let mut input = posts();
    input[0].title = None;
    let mut cfg = config(3);
    cfg.dispatch.strictness = Strictness::Lenient;

    let mut capture = Capture::default();
    let summary = run_with(&StaticFetcher(input), &SvgRenderer::default(), &mut capture, &cfg)
        .unwrap();

    assert_eq!(summary.analyzed, 2);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].0, 1);
    let ids: Vec<i64> = capture
        .document
        .unwrap()
        .sections
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn render_failure_only_affects_its_chart() {
    let mut writer = StreamWriter::new(Vec::new());
    let summary = run_with(&StaticFetcher(posts()), &NoClouds, &mut writer, &config(3)).unwrap();

    assert_eq!(summary.analyzed, 3);
    assert_eq!(summary.placeholders, 3);

    let html = String::from_utf8(writer.into_inner()).unwrap();
    assert_eq!(html.matches("Word Cloud unavailable").count(), 3);
    assert_eq!(html.matches("alt='Bar Chart'").count(), 3);
}

#[test]
fn file_report_contains_every_post() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.html");
    run_with(
        &StaticFetcher(posts()),
        &SvgRenderer::default(),
        &mut FileWriter::new(&path),
        &config(3),
    )
    .unwrap();

    let html = std::fs::read_to_string(&path).unwrap();
    let first = html.find("<h2>Post 1</h2>").unwrap();
    let second = html.find("<h2>Post 2</h2>").unwrap();
    let third = html.find("<h2>Post 3</h2>").unwrap();
    assert!(first < second && second < third);
}
