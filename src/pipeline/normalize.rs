use crate::error::{Result, SeederError};
use crate::types::{RawRow, SlotRecord};
use tracing::{debug, trace};

/// Which CSV columns carry the game name and the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelector {
    /// Zero-based column positions
    Index { game: usize, provider: usize },
    /// Header names, matched case-sensitively
    Header { game: String, provider: String },
}

impl Default for FieldSelector {
    fn default() -> Self {
        FieldSelector::Index { game: 0, provider: 1 }
    }
}

impl FieldSelector {
    pub fn by_header(game: impl Into<String>, provider: impl Into<String>) -> Self {
        FieldSelector::Header {
            game: game.into(),
            provider: provider.into(),
        }
    }

    /// Turns the selector into concrete column positions for this header row.
    pub fn resolve(&self, headers: &[String]) -> Result<ColumnPair> {
        let pair = match self {
            FieldSelector::Index { game, provider } => ColumnPair {
                game: index_within(headers, *game)?,
                provider: index_within(headers, *provider)?,
            },
            FieldSelector::Header { game, provider } => ColumnPair {
                game: header_position(headers, game)?,
                provider: header_position(headers, provider)?,
            },
        };
        if pair.game == pair.provider {
            return Err(SeederError::InvalidConfiguration(format!(
                "game and provider both map to column {}",
                pair.game
            )));
        }
        Ok(pair)
    }
}

fn index_within(headers: &[String], index: usize) -> Result<usize> {
    if index < headers.len() {
        Ok(index)
    } else {
        Err(SeederError::InvalidConfiguration(format!(
            "column index {index} is out of range for {} header columns",
            headers.len()
        )))
    }
}

fn header_position(headers: &[String], name: &str) -> Result<usize> {
    headers.iter().position(|h| h == name).ok_or_else(|| {
        SeederError::InvalidConfiguration(format!(
            "header '{name}' not found (available: {headers:?})"
        ))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPair {
    pub game: usize,
    pub provider: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeStats {
    pub rows_read: usize,
    pub records: usize,
    pub skipped: usize,
}

/// Lazily maps raw rows to slot records, dropping rows that lack either field.
///
/// Decode errors from the underlying rows are passed through untouched.
pub struct Normalizer<I> {
    rows: I,
    columns: ColumnPair,
    stats: NormalizeStats,
}

impl<I> Normalizer<I>
where
    I: Iterator<Item = Result<RawRow>>,
{
    pub fn new(rows: I, columns: ColumnPair) -> Self {
        Self {
            rows,
            columns,
            stats: NormalizeStats::default(),
        }
    }

    pub fn stats(&self) -> NormalizeStats {
        self.stats
    }

    fn normalize_row(&self, row: &RawRow) -> Option<SlotRecord> {
        let game = row.get(self.columns.game)?;
        let provider = row.get(self.columns.provider)?;
        SlotRecord::from_fields(game, provider)
    }
}

impl<I> Iterator for Normalizer<I>
where
    I: Iterator<Item = Result<RawRow>>,
{
    type Item = Result<SlotRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = match self.rows.next()? {
                Ok(row) => row,
                Err(e) => return Some(Err(e)),
            };
            self.stats.rows_read += 1;

            match self.normalize_row(&row) {
                Some(record) => {
                    self.stats.records += 1;
                    trace!("{} ({})", record.game_name, record.provider);
                    return Some(Ok(record));
                }
                None => {
                    self.stats.skipped += 1;
                    debug!("Skipping row {}: missing game or provider: {:?}", self.stats.rows_read, row);
                }
            }
        }
    }
}
