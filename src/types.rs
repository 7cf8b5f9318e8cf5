use std::fmt;

/// One decoded CSV line, fields in column order
pub type RawRow = Vec<String>;

/// A slot game as it lands in the `slots` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRecord {
    pub game_name: String,
    pub provider: String,
}

impl SlotRecord {
    /// Trims both fields and rejects the pair if either ends up empty.
    pub fn from_fields(game_name: &str, provider: &str) -> Option<Self> {
        let game_name = game_name.trim();
        let provider = provider.trim();
        if game_name.is_empty() || provider.is_empty() {
            return None;
        }
        Some(Self {
            game_name: game_name.to_string(),
            provider: provider.to_string(),
        })
    }
}

/// A window of consecutive records rendered as one INSERT
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    /// 1-based position in emission order
    pub number: usize,
    pub records: &'a [SlotRecord],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Clear,
    Insert { rows: usize },
}

/// A complete, independently executable SQL statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStatement {
    kind: StatementKind,
    text: String,
}

impl SqlStatement {
    pub(crate) fn new(kind: StatementKind, text: String) -> Self {
        Self { kind, text }
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of value rows, zero for a DELETE
    pub fn row_count(&self) -> usize {
        match self.kind {
            StatementKind::Insert { rows } => rows,
            StatementKind::Clear => 0,
        }
    }
}

impl fmt::Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
