pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod infra;
pub mod logging;
pub mod pipeline;
pub mod types;

pub use error::{Result, SeederError};
pub use pipeline::{PipelineConfig, PipelineStats, SeedOutput, SeedPipeline};
pub use types::{SlotRecord, SqlStatement};
