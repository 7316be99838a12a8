use clap::Parser;
use std::path::PathBuf;

use crate::fetcher::DEFAULT_SOURCE_URL;

#[derive(Parser, Debug)]
#[command(
    name = "postlens",
    about = "Compare title and body vocabulary of posts and render a word-frequency report",
    version,
    long_about = None
)]
pub struct Args {
    /// Number of posts to analyze
    #[arg(default_value_t = 5)]
    pub count: usize,

    /// Report destination, or "-" for stdout
    #[arg(short, long, default_value = "report.html")]
    pub output: PathBuf,

    /// Endpoint returning a JSON array of posts
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    /// Number of worker threads
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Number of words shown in each bar chart
    #[arg(long, default_value_t = 10)]
    pub top_k: usize,

    /// Skip posts with missing fields instead of failing the run
    #[arg(long)]
    pub lenient: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
