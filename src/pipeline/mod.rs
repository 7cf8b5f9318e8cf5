// CSV export -> slot records -> batched INSERT statements

pub mod emit;
pub mod normalize;
pub mod reader;
pub mod render;

pub use emit::{escape_literal, BatchEmitter, ConflictPolicy, EmitterConfig};
pub use normalize::{FieldSelector, Normalizer};
pub use reader::read_rows;
pub use render::{render, BatchSeparator, RenderOptions};

use crate::app::ports::SourcePort;
use crate::constants::{METRIC_ROWS_READ, METRIC_ROWS_SKIPPED, METRIC_STATEMENTS};
use crate::error::{Result, SeederError};
use crate::types::{SlotRecord, SqlStatement};
use metrics::counter;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    pub fields: FieldSelector,
    pub emitter: EmitterConfig,
}

/// Counts from a single run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub rows_read: usize,
    pub records: usize,
    pub skipped: usize,
    pub insert_statements: usize,
}

#[derive(Debug)]
pub struct SeedOutput {
    pub statements: Vec<SqlStatement>,
    pub stats: PipelineStats,
}

impl SeedOutput {
    pub fn render(&self, options: &RenderOptions) -> String {
        render::render(&self.statements, &self.stats, options)
    }
}

/// First rows of an export, for eyeballing the column layout
#[derive(Debug)]
pub struct Preview {
    pub headers: Vec<String>,
    pub records: Vec<SlotRecord>,
}

pub struct SeedPipeline {
    fields: FieldSelector,
    emitter: BatchEmitter,
}

impl SeedPipeline {
    /// Fails with `InvalidConfiguration` before any input is touched.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let emitter = BatchEmitter::new(config.emitter)?;
        Ok(Self {
            fields: config.fields,
            emitter,
        })
    }

    /// Fetches the export through `source` and runs it.
    #[instrument(skip(self, source))]
    pub async fn run_source(&self, source: &dyn SourcePort, location: &str) -> Result<SeedOutput> {
        info!("Fetching {}", location);
        let fetched = source.fetch(location).await?;
        if !fetched.is_success() {
            warn!("Source responded with status {}", fetched.status);
            return Err(SeederError::SourceUnavailable(format!(
                "{location} responded with status {}",
                fetched.status
            )));
        }
        info!("Fetched {} bytes", fetched.bytes.len());
        self.run_bytes(&fetched.bytes)
    }

    /// Reads, normalizes and emits. Statements are only handed back once the
    /// whole input decoded cleanly.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn run_bytes(&self, bytes: &[u8]) -> Result<SeedOutput> {
        let rows = read_rows(bytes)?;
        let columns = self.fields.resolve(rows.headers())?;

        let mut normalizer = Normalizer::new(rows, columns);
        let records: Vec<SlotRecord> = normalizer.by_ref().collect::<Result<_>>()?;
        let counts = normalizer.stats();

        let statements = self.emitter.emit(&records);
        let stats = PipelineStats {
            rows_read: counts.rows_read,
            records: counts.records,
            skipped: counts.skipped,
            insert_statements: statements.iter().filter(|s| s.row_count() > 0).count(),
        };

        counter!(METRIC_ROWS_READ).increment(stats.rows_read as u64);
        counter!(METRIC_ROWS_SKIPPED).increment(stats.skipped as u64);
        counter!(METRIC_STATEMENTS).increment(statements.len() as u64);
        info!(
            "✅ {} slots from {} rows ({} skipped) in {} INSERT statements",
            stats.records, stats.rows_read, stats.skipped, stats.insert_statements
        );

        Ok(SeedOutput { statements, stats })
    }

    /// Headers plus the first `limit` normalized records.
    pub fn preview(&self, bytes: &[u8], limit: usize) -> Result<Preview> {
        let rows = read_rows(bytes)?;
        let headers = rows.headers().to_vec();
        let columns = self.fields.resolve(&headers)?;
        let records = Normalizer::new(rows, columns)
            .take(limit)
            .collect::<Result<Vec<_>>>()?;
        Ok(Preview { headers, records })
    }
}
