use anyhow::{Context, Result};
use std::io;
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::dispatcher::{analyze_all, DispatchConfig, Strictness};
use crate::fetcher::{HttpFetcher, SourceFetcher};
use crate::renderer::{ChartRenderer, SvgRenderer};
use crate::report::{assemble, ReportOptions};
use crate::writer::{DocumentWriter, FileWriter, StreamWriter};
use crate::Args;

#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub count: usize,
    pub dispatch: DispatchConfig,
    pub report: ReportOptions,
}

impl From<&Args> for PipelineConfig {
    fn from(args: &Args) -> Self {
        Self {
            count: args.count,
            dispatch: DispatchConfig {
                workers: args.workers,
                strictness: if args.lenient {
                    Strictness::Lenient
                } else {
                    Strictness::Strict
                },
            },
            report: ReportOptions {
                top_k: args.top_k,
                ..ReportOptions::default()
            },
        }
    }
}

/// What a run produced, for display.
#[derive(Debug)]
pub struct RunSummary {
    pub fetched: usize,
    pub analyzed: usize,
    pub skipped: Vec<(i64, String)>,
    pub total_words: u64,
    pub placeholders: usize,
}

/// fetch → analyze → assemble → write.
///
/// Nothing is written unless every earlier stage succeeded.
pub fn run_with(
    fetcher: &dyn SourceFetcher,
    renderer: &dyn ChartRenderer,
    writer: &mut dyn DocumentWriter,
    config: &PipelineConfig,
) -> Result<RunSummary> {
    let total_start_time = Instant::now();
    info!(
        action = "start",
        component = "pipeline",
        count = config.count,
        "Starting post analysis"
    );

    let records = fetcher.fetch(config.count).context("Failed to fetch posts")?;
    let batch = analyze_all(&records, &config.dispatch).context("Failed to analyze posts")?;
    let document = assemble(&batch.results, renderer, &config.report);
    writer.write(&document).context("Failed to write report")?;

    let summary = RunSummary {
        fetched: records.len(),
        analyzed: batch.results.len(),
        skipped: batch
            .skipped
            .iter()
            .map(|s| (s.id, s.error.to_string()))
            .collect(),
        total_words: batch.results.iter().map(|r| r.all_words.total()).sum(),
        placeholders: document.placeholder_count(),
    };

    info!(
        action = "complete",
        component = "pipeline",
        duration_ms = total_start_time.elapsed().as_millis(),
        "Analysis completed successfully"
    );
    Ok(summary)
}

pub fn run(args: &Args) -> Result<RunSummary> {
    let config = PipelineConfig::from(args);
    let fetcher = HttpFetcher::new(&args.source_url)?;
    let renderer = SvgRenderer::default();

    if args.output == Path::new("-") {
        let mut writer = StreamWriter::new(io::stdout().lock());
        run_with(&fetcher, &renderer, &mut writer, &config)
    } else {
        let mut writer = FileWriter::new(&args.output);
        run_with(&fetcher, &renderer, &mut writer, &config)
    }
}

pub fn print_summary(summary: &RunSummary, args: &Args) {
    // stdout carries the report itself in that mode
    if args.output == Path::new("-") {
        return;
    }

    println!("\n--- Post Analysis ---");
    println!("Posts fetched: {}", summary.fetched);
    println!("Posts analyzed: {}", summary.analyzed);
    println!(
        "Words counted: {}",
        crate::utils::format_number(summary.total_words)
    );
    if summary.placeholders > 0 {
        println!("Charts not rendered: {}", summary.placeholders);
    }
    if !summary.skipped.is_empty() {
        println!("\nSkipped posts:");
        for (id, reason) in &summary.skipped {
            println!("- {}: {}", id, reason);
        }
    }
    println!("\nReport written to {}", args.output.display());
}
