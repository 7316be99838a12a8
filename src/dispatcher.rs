use rayon::prelude::*;
use std::time::Instant;
use tracing::{info, warn};

use crate::analyzer::{analyze, AnalysisResult};
use crate::error::{PipelineError, Result};
use crate::record::Record;

/// What to do when a single record cannot be analyzed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Fail the whole batch.
    #[default]
    Strict,
    /// Leave the record out and report it in [`Batch::skipped`].
    Lenient,
}

#[derive(Debug, Clone, Default)]
pub struct DispatchConfig {
    /// Worker threads; `None` uses the available parallelism.
    pub workers: Option<usize>,
    pub strictness: Strictness,
}

#[derive(Debug)]
pub struct SkippedRecord {
    pub id: i64,
    pub error: PipelineError,
}

/// Analysis output in input order.
#[derive(Debug, Default)]
pub struct Batch {
    pub results: Vec<AnalysisResult>,
    pub skipped: Vec<SkippedRecord>,
}

pub fn analyze_all(records: &[Record], config: &DispatchConfig) -> Result<Batch> {
    analyze_all_with(records, config, analyze)
}

/// Runs `analyzer` over every record on a dedicated thread pool.
///
/// `results[i]` always belongs to the i-th surviving input record, however the
/// workers happen to finish. In strict mode all in-flight work drains and the
/// failure of the earliest failing record is returned.
pub fn analyze_all_with<F>(
    records: &[Record],
    config: &DispatchConfig,
    analyzer: F,
) -> Result<Batch>
where
    F: Fn(&Record) -> Result<AnalysisResult> + Sync,
{
    if records.is_empty() {
        info!(
            action = "skip",
            component = "dispatcher",
            "No records to analyze"
        );
        return Ok(Batch::default());
    }

    let workers = match config.workers {
        Some(0) => {
            return Err(PipelineError::InvalidConfig(
                "worker count must be greater than 0".to_string(),
            ))
        }
        Some(n) => n,
        None => num_cpus::get(),
    };

    let start_time = Instant::now();
    info!(
        action = "start",
        component = "dispatcher",
        record_count = records.len(),
        workers,
        "Starting parallel record analysis"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("analyzer-{index}"))
        .build()
        .map_err(|e| PipelineError::InvalidConfig(format!("failed to build worker pool: {e}")))?;

    // Indexed collect writes each outcome into its input position, not completion order
    let outcomes: Vec<(usize, Result<AnalysisResult>)> = pool.install(|| {
        records
            .par_iter()
            .enumerate()
            .map(|(position, record)| (position, analyzer(record)))
            .collect()
    });

    let mut batch = Batch {
        results: Vec::with_capacity(records.len()),
        skipped: Vec::new(),
    };

    for (position, outcome) in outcomes {
        let record = &records[position];
        match outcome {
            Ok(result) => batch.results.push(result),
            Err(error) => match config.strictness {
                Strictness::Strict => {
                    warn!(
                        action = "abort",
                        component = "dispatcher",
                        record_id = record.id,
                        error = %error,
                        "Record analysis failed"
                    );
                    return Err(error);
                }
                Strictness::Lenient => {
                    warn!(
                        action = "skip",
                        component = "dispatcher",
                        record_id = record.id,
                        error = %error,
                        "Skipping record that failed analysis"
                    );
                    batch.skipped.push(SkippedRecord {
                        id: record.id,
                        error,
                    });
                }
            },
        }
    }

    info!(
        action = "complete",
        component = "dispatcher",
        analyzed = batch.results.len(),
        skipped = batch.skipped.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Record analysis completed"
    );

    Ok(batch)
}
