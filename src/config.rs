use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_SOURCE_URL, DEFAULT_TABLE, GAME_NAME_COLUMN, PROVIDER_COLUMN,
    SOURCE_URL_ENV,
};
use crate::error::{Result, SeederError};
use crate::pipeline::{
    BatchSeparator, ConflictPolicy, EmitterConfig, FieldSelector, PipelineConfig, RenderOptions,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub fields: FieldsConfig,
    pub sql: SqlConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: Option<String>,
    /// Local CSV path; wins over `url` when both are set
    pub file: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Column selection. Header names take precedence over indices.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FieldsConfig {
    pub game_index: Option<usize>,
    pub provider_index: Option<usize>,
    pub game_header: Option<String>,
    pub provider_header: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ConflictMode {
    #[default]
    None,
    DoNothing,
    DoNothingOn,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SqlConfig {
    pub table: String,
    pub game_column: String,
    pub provider_column: String,
    pub batch_size: usize,
    pub conflict: ConflictMode,
    /// Conflict target for `do_nothing_on`; empty means the two value columns
    pub conflict_columns: Vec<String>,
    pub pre_clear: bool,
}

impl Default for SqlConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            game_column: GAME_NAME_COLUMN.to_string(),
            provider_column: PROVIDER_COLUMN.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            conflict: ConflictMode::None,
            conflict_columns: Vec::new(),
            pre_clear: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub separator: BatchSeparator,
    pub annotate: bool,
}

/// Command-line values; `None` keeps whatever the lower layers set
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub url: Option<String>,
    pub file: Option<String>,
    /// (game header, provider header)
    pub by_header: Option<(String, String)>,
    pub table: Option<String>,
    pub batch_size: Option<usize>,
    pub conflict: Option<ConflictMode>,
    pub conflict_columns: Option<Vec<String>>,
    pub pre_clear: Option<bool>,
    pub separator: Option<BatchSeparator>,
    pub annotate: Option<bool>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            SeederError::InvalidConfiguration(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        debug!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        if config_path.as_ref().exists() {
            Self::load(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// File, then `SLOT_SEEDER_URL`, then command-line overrides; later
    /// layers win.
    pub fn layered<P: AsRef<Path>>(config_path: P, overrides: Overrides) -> Result<Self> {
        let mut config = Self::load_or_default(config_path)?;
        config.apply_env_url(std::env::var(SOURCE_URL_ENV).ok());
        config.apply_overrides(overrides);
        Ok(config)
    }

    /// A non-blank URL from the environment replaces the file's source,
    /// including a configured local `file`.
    pub fn apply_env_url(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.source.url = Some(url.trim().to_string());
            self.source.file = None;
        }
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.url {
            self.source.url = Some(url);
            self.source.file = None;
        }
        if let Some(file) = overrides.file {
            self.source.file = Some(file);
        }
        if let Some((game, provider)) = overrides.by_header {
            self.fields.game_header = Some(game);
            self.fields.provider_header = Some(provider);
        }
        if let Some(table) = overrides.table {
            self.sql.table = table;
        }
        if let Some(batch_size) = overrides.batch_size {
            self.sql.batch_size = batch_size;
        }
        if let Some(conflict) = overrides.conflict {
            self.sql.conflict = conflict;
        }
        if let Some(columns) = overrides.conflict_columns {
            self.sql.conflict_columns = columns;
        }
        if let Some(pre_clear) = overrides.pre_clear {
            self.sql.pre_clear = pre_clear;
        }
        if let Some(separator) = overrides.separator {
            self.output.separator = separator;
        }
        if let Some(annotate) = overrides.annotate {
            self.output.annotate = annotate;
        }
    }

    pub fn source_url(&self) -> &str {
        self.source.url.as_deref().unwrap_or(DEFAULT_SOURCE_URL)
    }

    pub fn field_selector(&self) -> Result<FieldSelector> {
        let f = &self.fields;
        match (&f.game_header, &f.provider_header) {
            (Some(game), Some(provider)) => Ok(FieldSelector::by_header(game.clone(), provider.clone())),
            (None, None) => Ok(FieldSelector::Index {
                game: f.game_index.unwrap_or(0),
                provider: f.provider_index.unwrap_or(1),
            }),
            _ => Err(SeederError::InvalidConfiguration(
                "game_header and provider_header must be set together".into(),
            )),
        }
    }

    pub fn conflict_policy(&self) -> ConflictPolicy {
        match self.sql.conflict {
            ConflictMode::None => ConflictPolicy::None,
            ConflictMode::DoNothing => ConflictPolicy::DoNothing,
            ConflictMode::DoNothingOn if self.sql.conflict_columns.is_empty() => {
                ConflictPolicy::DoNothingOn(vec![
                    self.sql.game_column.clone(),
                    self.sql.provider_column.clone(),
                ])
            }
            ConflictMode::DoNothingOn => ConflictPolicy::DoNothingOn(self.sql.conflict_columns.clone()),
        }
    }

    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        Ok(PipelineConfig {
            fields: self.field_selector()?,
            emitter: EmitterConfig {
                table: self.sql.table.clone(),
                game_column: self.sql.game_column.clone(),
                provider_column: self.sql.provider_column.clone(),
                batch_size: self.sql.batch_size,
                conflict_policy: self.conflict_policy(),
                pre_clear: self.sql.pre_clear,
            },
        })
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            separator: self.output.separator,
            annotate: self.output.annotate,
        }
    }
}
