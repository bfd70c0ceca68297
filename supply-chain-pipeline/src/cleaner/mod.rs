//! Cleaner stage.
//!
//! Reads the raw snapshot, normalizes column names, fills the known nullable
//! columns and writes the clean snapshot. Nulls in any other column pass
//! through untouched.

mod rules;

pub use rules::{FillRule, FillStrategy, DEFAULT_FILL_RULES};

use std::path::PathBuf;

use tracing::{info, instrument};

use crate::errors::PipelineError;
use crate::snapshot::{read_snapshot, write_snapshot, RowIndex};
use supply_chain_shared::{normalize_column_name, Table};

/// Outcome of a cleaning pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanSummary {
    /// Rows written.
    pub rows: usize,
    /// Number of cells filled, per rule column.
    pub filled: Vec<(String, usize)>,
}

/// A rule with its columns resolved to positions.
struct ResolvedRule {
    column: &'static str,
    target: usize,
    fill: ResolvedFill,
}

enum ResolvedFill {
    CopyFrom(usize),
    Literal(&'static str),
}

/// Find the single column with the given name.
fn resolve_column(table: &Table, name: &str) -> Result<usize, PipelineError> {
    let mut matches = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.as_str() == name)
        .map(|(i, _)| i);

    let index = matches
        .next()
        .ok_or_else(|| PipelineError::missing_column(name))?;
    if matches.next().is_some() {
        return Err(PipelineError::clean(format!(
            "column {} appears more than once after normalization",
            name
        )));
    }
    Ok(index)
}

/// Clean a raw table in memory.
///
/// Column names are normalized first, then each rule fills the null cells
/// of its column. A rule (or copy source) column missing from the table is
/// an error. A copy from a null source leaves the cell null.
pub fn clean_table(
    mut table: Table,
    rules: &[FillRule],
) -> Result<(Table, CleanSummary), PipelineError> {
    for column in &mut table.columns {
        *column = normalize_column_name(column);
    }

    let resolved = rules
        .iter()
        .map(|rule| {
            let target = resolve_column(&table, rule.column)?;
            let fill = match rule.strategy {
                FillStrategy::CopyFrom(source) => {
                    ResolvedFill::CopyFrom(resolve_column(&table, source)?)
                }
                FillStrategy::Literal(value) => ResolvedFill::Literal(value),
            };
            Ok(ResolvedRule {
                column: rule.column,
                target,
                fill,
            })
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;

    let mut filled = vec![0usize; resolved.len()];
    for row in &mut table.rows {
        for (rule, count) in resolved.iter().zip(filled.iter_mut()) {
            if row[rule.target].is_some() {
                continue;
            }
            let replacement = match rule.fill {
                ResolvedFill::CopyFrom(source) => row[source].clone(),
                ResolvedFill::Literal(value) => Some(value.to_string()),
            };
            if replacement.is_some() {
                row[rule.target] = replacement;
                *count += 1;
            }
        }
    }

    let summary = CleanSummary {
        rows: table.len(),
        filled: resolved
            .iter()
            .zip(filled)
            .map(|(rule, count)| (rule.column.to_string(), count))
            .collect(),
    };

    Ok((table, summary))
}

/// Cleaner that turns the raw snapshot into the clean snapshot.
pub struct Cleaner {
    input: PathBuf,
    output: PathBuf,
    rules: Vec<FillRule>,
}

impl Cleaner {
    /// Create a cleaner using the default fill rules.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self::with_rules(input, output, DEFAULT_FILL_RULES.to_vec())
    }

    /// Create a cleaner with custom fill rules.
    pub fn with_rules(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        rules: Vec<FillRule>,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            rules,
        }
    }

    /// Read the raw snapshot, clean it and write the clean snapshot.
    ///
    /// The output carries a leading row-index column that the loader uses as
    /// a row label.
    #[instrument(skip(self), fields(input = %self.input.display(), output = %self.output.display()))]
    pub fn run(&self) -> Result<CleanSummary, PipelineError> {
        let raw = read_snapshot(&self.input)?;
        let (clean, summary) = clean_table(raw, &self.rules)?;
        write_snapshot(&self.output, &clean, RowIndex::Include)?;

        info!(
            rows = summary.rows,
            filled = ?summary.filled,
            "Cleaned snapshot written"
        );
        Ok(summary)
    }
}
