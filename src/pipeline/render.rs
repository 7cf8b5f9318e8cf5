use super::PipelineStats;
use crate::types::{SqlStatement, StatementKind};
use serde::Deserialize;

/// What goes between consecutive statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BatchSeparator {
    None,
    #[default]
    #[value(name = "blank")]
    #[serde(alias = "blank")]
    BlankLine,
    /// `-- Batch N` above every INSERT
    Comment,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub separator: BatchSeparator,
    /// Wrap the script in `--` comments carrying the row counts
    pub annotate: bool,
}

/// Joins statements into one script. Same input, same bytes.
pub fn render(statements: &[SqlStatement], stats: &PipelineStats, options: &RenderOptions) -> String {
    let mut out = String::new();

    if options.annotate {
        out.push_str(&format!(
            "-- Rows read: {}, slots: {}, skipped: {}\n",
            stats.rows_read, stats.records, stats.skipped
        ));
        if !statements.is_empty() {
            out.push('\n');
        }
    }

    let mut batch = 0;
    for (i, statement) in statements.iter().enumerate() {
        if i > 0 && options.separator != BatchSeparator::None {
            out.push('\n');
        }
        if let StatementKind::Insert { .. } = statement.kind() {
            batch += 1;
            if options.separator == BatchSeparator::Comment {
                out.push_str(&format!("-- Batch {batch}\n"));
            }
        }
        out.push_str(statement.as_str());
        out.push('\n');
    }

    if options.annotate {
        if !statements.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("-- Total: {} slots\n", stats.records));
    }
    out
}
