use crate::constants::{DEFAULT_BATCH_SIZE, DEFAULT_TABLE, GAME_NAME_COLUMN, PROVIDER_COLUMN};
use crate::error::{Result, SeederError};
use crate::types::{Batch, SlotRecord, SqlStatement, StatementKind};
use tracing::debug;

/// How an INSERT treats rows that hit a uniqueness constraint
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    #[default]
    None,
    /// `ON CONFLICT DO NOTHING`
    DoNothing,
    /// `ON CONFLICT (col, ...) DO NOTHING`
    DoNothingOn(Vec<String>),
}

impl ConflictPolicy {
    fn clause(&self) -> Option<String> {
        match self {
            ConflictPolicy::None => None,
            ConflictPolicy::DoNothing => Some("ON CONFLICT DO NOTHING".to_string()),
            ConflictPolicy::DoNothingOn(columns) => {
                Some(format!("ON CONFLICT ({}) DO NOTHING", columns.join(", ")))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitterConfig {
    pub table: String,
    pub game_column: String,
    pub provider_column: String,
    pub batch_size: usize,
    pub conflict_policy: ConflictPolicy,
    /// Emit `DELETE FROM <table>;` ahead of the first batch
    pub pre_clear: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            game_column: GAME_NAME_COLUMN.to_string(),
            provider_column: PROVIDER_COLUMN.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            conflict_policy: ConflictPolicy::None,
            pre_clear: false,
        }
    }
}

impl EmitterConfig {
    /// Table and column names are written verbatim, so they must be plain
    /// identifiers (optionally schema-qualified).
    pub fn validate(&self) -> Result<()> {
        if self.batch_size < 1 {
            return Err(SeederError::InvalidConfiguration(format!(
                "batch_size must be at least 1, got {}",
                self.batch_size
            )));
        }
        check_identifier("table", &self.table)?;
        check_identifier("game column", &self.game_column)?;
        check_identifier("provider column", &self.provider_column)?;
        if let ConflictPolicy::DoNothingOn(columns) = &self.conflict_policy {
            if columns.is_empty() {
                return Err(SeederError::InvalidConfiguration(
                    "ON CONFLICT target needs at least one column".into(),
                ));
            }
            for column in columns {
                check_identifier("conflict column", column)?;
            }
        }
        Ok(())
    }
}

fn check_identifier(what: &str, name: &str) -> Result<()> {
    let valid = name.split('.').all(|part| {
        let mut chars = part.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    });
    if valid {
        Ok(())
    } else {
        Err(SeederError::InvalidConfiguration(format!(
            "{what} '{name}' is not a plain SQL identifier"
        )))
    }
}

/// SQL string-literal escaping: every `'` becomes `''`.
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Partitions records into consecutive windows of at most `batch_size`.
pub fn batches(records: &[SlotRecord], batch_size: usize) -> impl Iterator<Item = Batch<'_>> {
    records
        .chunks(batch_size.max(1))
        .enumerate()
        .map(|(i, records)| Batch { number: i + 1, records })
}

pub struct BatchEmitter {
    config: EmitterConfig,
}

impl BatchEmitter {
    pub fn new(config: EmitterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Renders every batch, preceded by the DELETE when `pre_clear` is set.
    ///
    /// No records means no statements, DELETE included.
    pub fn emit(&self, records: &[SlotRecord]) -> Vec<SqlStatement> {
        if records.is_empty() {
            debug!("No records to emit");
            return Vec::new();
        }

        let mut statements = Vec::with_capacity(records.len() / self.config.batch_size + 2);
        if self.config.pre_clear {
            statements.push(self.clear_statement());
        }
        statements.extend(batches(records, self.config.batch_size).map(|b| self.insert_statement(&b)));
        debug!("Emitted {} statements for {} records", statements.len(), records.len());
        statements
    }

    pub fn clear_statement(&self) -> SqlStatement {
        SqlStatement::new(StatementKind::Clear, format!("DELETE FROM {};", self.config.table))
    }

    pub fn insert_statement(&self, batch: &Batch<'_>) -> SqlStatement {
        let mut sql = format!(
            "INSERT INTO {} ({}, {}) VALUES\n",
            self.config.table, self.config.game_column, self.config.provider_column
        );
        let last = batch.records.len().saturating_sub(1);
        for (i, record) in batch.records.iter().enumerate() {
            sql.push_str(&format!(
                "  ('{}', '{}')",
                escape_literal(&record.game_name),
                escape_literal(&record.provider)
            ));
            if i < last {
                sql.push_str(",\n");
            }
        }
        if let Some(clause) = self.config.conflict_policy.clause() {
            sql.push(' ');
            sql.push_str(&clause);
        }
        sql.push(';');
        SqlStatement::new(
            StatementKind::Insert {
                rows: batch.records.len(),
            },
            sql,
        )
    }
}
