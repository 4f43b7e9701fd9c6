//! `changes_summary.csv`, one row per written pair.

use std::path::Path;

use serde::Serialize;

use crate::error::AppError;
use crate::models::PairReport;

use super::WrittenPair;

const HEADER: [&str; 10] = [
    "date",
    "doc_a",
    "doc_b",
    "tokens_added",
    "tokens_removed",
    "name_counts_a",
    "name_counts_b",
    "numbers_added",
    "numbers_removed",
    "pair_report",
];

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    date: String,
    doc_a: &'a str,
    doc_b: &'a str,
    tokens_added: usize,
    tokens_removed: usize,
    name_counts_a: String,
    name_counts_b: String,
    numbers_added: String,
    numbers_removed: String,
    pair_report: &'a str,
}

/// `{"name": count}` object for one side of a pair, in tracked-name order.
fn name_counts(report: &PairReport, side_a: bool) -> Result<String, AppError> {
    let mut counts = serde_json::Map::new();
    for mention in &report.result.names {
        let count = if side_a { mention.count_a } else { mention.count_b };
        counts.insert(mention.name.clone(), count.into());
    }
    Ok(serde_json::to_string(&counts)?)
}

/// Write `changes_summary.csv`. Rows keep the order of `written`.
///
/// The header row is always present, even when no pair was written.
pub fn write_summary(path: &Path, written: &[WrittenPair<'_>]) -> Result<(), AppError> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(HEADER)?;

    for pair in written {
        let result = &pair.report.result;
        writer.serialize(SummaryRow {
            date: pair.report.date.to_string(),
            doc_a: &pair.report.doc_a,
            doc_b: &pair.report.doc_b,
            tokens_added: result.tokens_added,
            tokens_removed: result.tokens_removed,
            name_counts_a: name_counts(pair.report, true)?,
            name_counts_b: name_counts(pair.report, false)?,
            numbers_added: result.numbers.added.join(","),
            numbers_removed: result.numbers.removed.join(","),
            pair_report: &pair.href,
        })?;
    }

    writer.flush().map_err(|source| AppError::io(path, source))
}
