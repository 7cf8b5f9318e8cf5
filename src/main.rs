use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};

use slot_seeder::app::ports::SourcePort;
use slot_seeder::config::{Config, ConflictMode, Overrides};
use slot_seeder::constants::{DEFAULT_CONFIG_PATH, DEFAULT_PREVIEW_LIMIT};
use slot_seeder::infra::{FileSource, ReqwestSource};
use slot_seeder::logging;
use slot_seeder::pipeline::{BatchSeparator, SeedPipeline};

#[derive(Parser)]
#[command(name = "slot_seeder")]
#[command(about = "Turns the slot catalogue CSV into SQL inserts for the slots table")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print batched INSERT statements for the export
    Generate {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        sql: SqlArgs,
        /// Write the script here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show the header row and the first normalized records
    Preview {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value_t = DEFAULT_PREVIEW_LIMIT)]
        limit: usize,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// TOML config file (skipped if absent)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// CSV export URL
    #[arg(long, conflicts_with = "file")]
    url: Option<String>,
    /// Local CSV file
    #[arg(long)]
    file: Option<String>,
    /// Pick columns by header name: GAME,PROVIDER
    #[arg(long, value_delimiter = ',')]
    by_header: Option<Vec<String>>,
}

#[derive(Args)]
struct SqlArgs {
    #[arg(long)]
    table: Option<String>,
    #[arg(long)]
    batch_size: Option<usize>,
    #[arg(long, value_enum)]
    conflict: Option<ConflictMode>,
    /// Conflict target columns for do-nothing-on (comma-separated)
    #[arg(long, value_delimiter = ',')]
    conflict_columns: Option<Vec<String>>,
    /// Emit DELETE FROM <table>; before the inserts
    #[arg(long, overrides_with = "no_pre_clear")]
    pre_clear: bool,
    /// Turn off a pre_clear set in the config file
    #[arg(long, overrides_with = "pre_clear")]
    no_pre_clear: bool,
    #[arg(long, value_enum)]
    separator: Option<BatchSeparator>,
    /// Add row counts as SQL comments
    #[arg(long, overrides_with = "no_annotate")]
    annotate: bool,
    /// Turn off annotate set in the config file
    #[arg(long, overrides_with = "annotate")]
    no_annotate: bool,
}

/// `--flag` / `--no-flag` pair; neither given leaves the config value alone
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl SourceArgs {
    fn overrides(&self) -> Result<Overrides> {
        let by_header = match self.by_header.as_deref() {
            Some([game, provider]) => Some((game.clone(), provider.clone())),
            Some(other) => anyhow::bail!("--by-header takes exactly two names, got {}", other.len()),
            None => None,
        };
        Ok(Overrides {
            url: self.url.clone(),
            file: self.file.clone(),
            by_header,
            ..Overrides::default()
        })
    }
}

impl SqlArgs {
    fn apply_to(self, overrides: &mut Overrides) {
        overrides.table = self.table;
        overrides.batch_size = self.batch_size;
        overrides.conflict = self.conflict;
        overrides.conflict_columns = self.conflict_columns;
        overrides.pre_clear = flag_pair(self.pre_clear, self.no_pre_clear);
        overrides.separator = self.separator;
        overrides.annotate = flag_pair(self.annotate, self.no_annotate);
    }
}

fn load_config(path: &Path, overrides: Overrides) -> Result<Config> {
    Config::layered(path, overrides).with_context(|| format!("loading {}", path.display()))
}

fn source_for(config: &Config) -> Result<(Box<dyn SourcePort>, String)> {
    if let Some(path) = &config.source.file {
        return Ok((Box::new(FileSource), path.clone()));
    }
    let source = match config.source.timeout_seconds {
        Some(secs) => ReqwestSource::with_timeout(Duration::from_secs(secs))?,
        None => ReqwestSource::new(),
    };
    Ok((Box::new(source), config.source_url().to_string()))
}

async fn generate(config: Config, output: Option<PathBuf>) -> Result<()> {
    let pipeline = SeedPipeline::new(config.pipeline_config()?)?;
    let (source, location) = source_for(&config)?;

    let result = pipeline.run_source(source.as_ref(), &location).await?;
    let script = result.render(&config.render_options());

    match output {
        Some(path) => {
            tokio::fs::write(&path, &script)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            info!("💾 Wrote {} statements to {}", result.statements.len(), path.display());
        }
        None => print!("{script}"),
    }
    Ok(())
}

async fn preview(config: Config, limit: usize) -> Result<()> {
    let pipeline = SeedPipeline::new(config.pipeline_config()?)?;
    let (source, location) = source_for(&config)?;

    let fetched = source.fetch(&location).await?;
    anyhow::ensure!(fetched.is_success(), "{location} responded with status {}", fetched.status);

    let preview = pipeline.preview(&fetched.bytes, limit)?;
    println!("Headers: {:?}", preview.headers);
    println!("First {} slots:", preview.records.len());
    for record in &preview.records {
        println!("  - {} ({})", record.game_name, record.provider);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let _guard = logging::init_logging();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Generate { source, sql, output } => {
            let mut overrides = source.overrides()?;
            sql.apply_to(&mut overrides);
            let config = load_config(&source.config, overrides)?;
            generate(config, output).await
        }
        Commands::Preview { source, limit } => {
            let config = load_config(&source.config, source.overrides()?)?;
            preview(config, limit).await
        }
    };

    if let Err(e) = &outcome {
        error!("Run failed: {:#}", e);
    }
    outcome
}
