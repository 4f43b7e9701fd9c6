//! Report emitter: writes the index page, one page per compared pair, the CSV
//! change summary and a machine-readable `summary.json`.
//!
//! Output layout:
//!
//! ```text
//! <out>/index.html
//! <out>/changes_summary.csv
//! <out>/summary.json
//! <out>/<date>/diff_<stemA>__VS__<stemB>.html
//! ```

pub mod html;
pub mod table;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{AppError, DiffError};
use crate::models::{ComparisonMode, PairFailure, PairReport};
use crate::services::ComparisonRun;

pub const INDEX_FILE: &str = "index.html";
pub const CSV_FILE: &str = "changes_summary.csv";
pub const SUMMARY_FILE: &str = "summary.json";

/// Characters of each file stem kept in a pair page name.
const STEM_CHARS: usize = 40;

/// A pair whose page was written, with its path relative to the output dir.
#[derive(Debug)]
pub struct WrittenPair<'a> {
    pub report: &'a PairReport,
    pub href: String,
}

/// Files produced by one [`ReportWriter::write`] call.
#[derive(Debug)]
pub struct ReportOutput {
    pub index: PathBuf,
    pub csv: PathBuf,
    pub summary: PathBuf,
    pub pages: Vec<PathBuf>,
    /// Pairs left out of the reports, from comparison or page writing.
    pub failures: Vec<PairFailure>,
}

#[derive(Serialize)]
struct Counts {
    documents: usize,
    groups: usize,
    active_groups: usize,
    unknown: usize,
    pairs: usize,
    failed_pairs: usize,
}

#[derive(Serialize)]
struct GroupSummary {
    date: NaiveDate,
    documents: Vec<String>,
    compared: bool,
}

#[derive(Serialize)]
struct PairSummary<'a> {
    #[serde(flatten)]
    report: &'a PairReport,
    report_path: &'a str,
}

#[derive(Serialize)]
struct RunSummary<'a> {
    mode: ComparisonMode,
    counts: Counts,
    groups: Vec<GroupSummary>,
    unknown: Vec<String>,
    pairs: Vec<PairSummary<'a>>,
    failures: &'a [PairFailure],
}

/// Writes the report artifacts of a comparison run into one directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    out_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Write every artifact of `run`.
    ///
    /// A pair page that cannot be written is logged and left out of the
    /// index and CSV; the other artifacts are still produced.
    pub fn write(&self, run: &ComparisonRun) -> Result<ReportOutput, AppError> {
        fs::create_dir_all(&self.out_dir).map_err(|source| AppError::io(&self.out_dir, source))?;

        let mut used = HashSet::new();
        let mut written = Vec::with_capacity(run.reports.len());
        let mut pages = Vec::with_capacity(run.reports.len());
        let mut failures = run.failures.clone();

        for report in &run.reports {
            let href = unique_href(report, &mut used);
            match self.write_page(report, &href) {
                Ok(path) => {
                    tracing::debug!(page = %path.display(), "Wrote pair report");
                    pages.push(path);
                    written.push(WrittenPair { report, href });
                }
                Err(err) => {
                    let err = DiffError::Report(err.to_string());
                    tracing::warn!(
                        date = %report.date,
                        doc_a = %report.doc_a,
                        doc_b = %report.doc_b,
                        error = %err,
                        "Pair report failed"
                    );
                    failures.push(PairFailure {
                        date: report.date,
                        index: report.index,
                        doc_a: report.doc_a.clone(),
                        doc_b: report.doc_b.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let csv = self.out_dir.join(CSV_FILE);
        table::write_summary(&csv, &written)?;

        let summary = self.out_dir.join(SUMMARY_FILE);
        self.write_summary_json(&summary, run, &written, &failures)?;

        let index = self.out_dir.join(INDEX_FILE);
        fs::write(&index, html::index_page(run, &written))
            .map_err(|source| AppError::io(&index, source))?;

        tracing::info!(
            out = %self.out_dir.display(),
            pages = pages.len(),
            failed = failures.len(),
            "Wrote reports"
        );

        Ok(ReportOutput {
            index,
            csv,
            summary,
            pages,
            failures,
        })
    }

    fn write_page(&self, report: &PairReport, href: &str) -> Result<PathBuf, AppError> {
        let path = self.out_dir.join(href);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| AppError::io(parent, source))?;
        }
        fs::write(&path, html::pair_page(report)).map_err(|source| AppError::io(&path, source))?;
        Ok(path)
    }

    fn write_summary_json(
        &self,
        path: &Path,
        run: &ComparisonRun,
        written: &[WrittenPair<'_>],
        failures: &[PairFailure],
    ) -> Result<(), AppError> {
        let grouping = &run.grouping;
        let summary = RunSummary {
            mode: run.mode,
            counts: Counts {
                documents: grouping.document_count(),
                groups: grouping.groups.len(),
                active_groups: grouping.active_groups().count(),
                unknown: grouping.unknown.len(),
                pairs: written.len() + failures.len(),
                failed_pairs: failures.len(),
            },
            groups: grouping
                .groups
                .iter()
                .map(|g| GroupSummary {
                    date: g.date,
                    documents: g.documents.iter().map(|d| d.id()).collect(),
                    compared: g.is_active(),
                })
                .collect(),
            unknown: grouping.unknown.iter().map(|d| d.id()).collect(),
            pairs: written
                .iter()
                .map(|w| PairSummary {
                    report: w.report,
                    report_path: &w.href,
                })
                .collect(),
            failures,
        };

        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(path, json).map_err(|source| AppError::io(path, source))
    }
}

/// Page name for a pair: `diff_<stemA>__VS__<stemB>.html`, stems cut to
/// [`STEM_CHARS`] characters.
pub fn pair_file_name(stem_a: &str, stem_b: &str) -> String {
    let a: String = stem_a.chars().take(STEM_CHARS).collect();
    let b: String = stem_b.chars().take(STEM_CHARS).collect();
    format!("diff_{}__VS__{}.html", a, b)
}

/// Relative page path, with a numeric suffix when the name is already taken.
fn unique_href(report: &PairReport, used: &mut HashSet<String>) -> String {
    let name = pair_file_name(&report.stem_a, &report.stem_b);
    let mut href = format!("{}/{}", report.date, name);
    let mut n = 2;
    while used.contains(&href) {
        let stem = name.trim_end_matches(".html");
        href = format!("{}/{}_{}.html", report.date, stem, n);
        n += 1;
    }
    used.insert(href.clone());
    href
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::DocumentInput;
    use crate::services::ComparisonService;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn input(path: &str, text: &str, secs: i64) -> DocumentInput {
        DocumentInput::new(path, text, Utc.timestamp_opt(secs, 0).unwrap())
    }

    fn run_of(inputs: Vec<DocumentInput>) -> ComparisonRun {
        let mut config = Config::default();
        config.compare.names = vec!["Noel".to_string()];
        ComparisonService::from_config(Arc::new(config)).run(inputs).unwrap()
    }

    fn csv_rows(path: &Path) -> Vec<csv::StringRecord> {
        csv::Reader::from_path(path)
            .unwrap()
            .records()
            .map(|r| r.unwrap())
            .collect()
    }

    #[test]
    fn test_pair_file_name_truncates_stems() {
        let long = "x".repeat(60);
        let name = pair_file_name(&long, "b");
        assert_eq!(name, format!("diff_{}__VS__b.html", "x".repeat(40)));
    }

    #[test]
    fn test_write_all_artifacts() {
        let run = run_of(vec![
            input("in/a.txt", "Date: 01/08/2024\nNoel had 12", 1),
            input("in/b.txt", "Date: 01/08/2024\nNeil had 8", 2),
            input("in/solo.txt", "Date: 03/10/2024\nalone", 3),
            input("in/undated.txt", "no date", 4),
        ]);
        let dir = TempDir::new().unwrap();
        let output = ReportWriter::new(dir.path()).write(&run).unwrap();

        assert_eq!(output.pages.len(), 1);
        assert!(output.failures.is_empty());
        assert!(dir.path().join("2024-01-08/diff_a__VS__b.html").is_file());

        let rows = csv_rows(&output.csv);
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][9], "2024-01-08/diff_a__VS__b.html");

        let index = fs::read_to_string(&output.index).unwrap();
        assert!(index.contains("href='2024-01-08/diff_a__VS__b.html'"));
        assert!(index.contains("no comparison needed"));
        assert!(index.contains("Docs with Unknown Date"));
        assert!(index.contains("in/undated.txt"));

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output.summary).unwrap()).unwrap();
        assert_eq!(summary["mode"], "baseline");
        assert_eq!(summary["counts"]["documents"], 4);
        assert_eq!(summary["counts"]["pairs"], 1);
        assert_eq!(summary["groups"][1]["compared"], false);
        assert_eq!(summary["pairs"][0]["numbers"]["added"][0], "8");
        assert!(summary["pairs"][0].get("fragment").is_none());
    }

    #[test]
    fn test_colliding_page_names_get_suffix() {
        let run = run_of(vec![
            input("base/base.txt", "Date: 01/08/2024\none", 1),
            input("x/report.txt", "Date: 01/08/2024\ntwo", 2),
            input("y/report.txt", "Date: 01/08/2024\nthree", 3),
        ]);
        let dir = TempDir::new().unwrap();
        let output = ReportWriter::new(dir.path()).write(&run).unwrap();

        let rows = csv_rows(&output.csv);
        assert_eq!(&rows[0][9], "2024-01-08/diff_base__VS__report.html");
        assert_eq!(&rows[1][9], "2024-01-08/diff_base__VS__report_2.html");
        assert_eq!(output.pages.len(), 2);
    }

    #[test]
    fn test_page_failure_is_isolated() {
        let run = run_of(vec![
            input("in/a.txt", "Date: 01/08/2024\none", 1),
            input("in/b.txt", "Date: 01/08/2024\ntwo", 2),
            input("in/c.txt", "Date: 03/10/2024\nthree", 3),
            input("in/d.txt", "Date: 03/10/2024\nfour", 4),
        ]);
        let dir = TempDir::new().unwrap();
        // A plain file where the date directory should go.
        fs::write(dir.path().join("2024-01-08"), "blocked").unwrap();

        let output = ReportWriter::new(dir.path()).write(&run).unwrap();
        assert_eq!(output.failures.len(), 1);
        assert!(output.failures[0].reason.starts_with("Failed to write pair report"));

        let rows = csv_rows(&output.csv);
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "2024-03-10");

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output.summary).unwrap()).unwrap();
        assert_eq!(summary["counts"]["failed_pairs"], 1);
    }
}
