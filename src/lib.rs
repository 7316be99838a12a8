pub mod analyzer;
pub mod args;
pub mod dispatcher;
pub mod error;
pub mod fetcher;
pub mod pipeline;
pub mod record;
pub mod renderer;
pub mod report;
pub mod tokenize;
pub mod utils;
pub mod writer;

pub use analyzer::{analyze, AnalysisResult};
pub use args::Args;
pub use dispatcher::{analyze_all, Batch, DispatchConfig, Strictness};
pub use error::{PipelineError, RenderError};
pub use pipeline::run;
pub use record::Record;
pub use report::{assemble, Document};
pub use tokenize::{count, FrequencyMap};
