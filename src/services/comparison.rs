//! The comparison pipeline: resolve dates, group, plan and compare pairs.

use std::sync::Arc;

use rayon::prelude::*;

use crate::config::Config;
use crate::context::Context;
use crate::error::{AppError, DiffError};
use crate::models::{
    ComparisonMode, ComparisonPair, DiffResult, Document, DocumentInput, Grouping, PairFailure,
    PairReport,
};
use crate::services::diff::Differ;
use crate::services::grouping::{group, resolve_documents};
use crate::services::planner::plan;
use crate::services::signals::{extract, NameMatcher};

/// Output of one comparison run, ready for the report emitter.
#[derive(Debug)]
pub struct ComparisonRun {
    pub grouping: Grouping,
    /// Successful pairs in ascending date order, then plan order.
    pub reports: Vec<PairReport>,
    pub failures: Vec<PairFailure>,
    pub mode: ComparisonMode,
}

impl ComparisonRun {
    pub fn pair_count(&self) -> usize {
        self.reports.len() + self.failures.len()
    }
}

/// Runs date-grouped document comparisons.
#[derive(Clone)]
pub struct ComparisonService {
    config: Arc<Config>,
}

impl ComparisonService {
    pub fn new(ctx: &Context) -> Self {
        Self {
            config: Arc::clone(&ctx.config),
        }
    }

    pub fn from_config(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Compare every planned pair of every date group.
    ///
    /// A pair that fails is logged and recorded in `failures`; the run
    /// carries on with the remaining pairs.
    pub fn run(&self, inputs: Vec<DocumentInput>) -> Result<ComparisonRun, AppError> {
        let compare = &self.config.compare;
        let tracked = compare.tracked_names();
        let names = NameMatcher::new(&tracked).map_err(|source| AppError::Pattern {
            pattern: tracked.join(","),
            source,
        })?;
        let differ = Differ::new(compare.max_tokens);

        let grouping = group(resolve_documents(inputs));
        tracing::info!(
            documents = grouping.document_count(),
            groups = grouping.groups.len(),
            unknown = grouping.unknown.len(),
            "Grouped documents by date"
        );

        let mut reports = Vec::new();
        let mut failures = Vec::new();

        for date_group in grouping.active_groups() {
            let pairs = plan(date_group, compare.mode);
            tracing::debug!(date = %date_group.date, pairs = pairs.len(), "Planned comparisons");

            // Collecting keeps plan order whether or not the work is parallel.
            let results: Vec<Result<DiffResult, DiffError>> = if compare.parallel {
                pairs
                    .par_iter()
                    .map(|pair| compare_documents(&differ, &names, pair.a, pair.b))
                    .collect()
            } else {
                pairs
                    .iter()
                    .map(|pair| compare_documents(&differ, &names, pair.a, pair.b))
                    .collect()
            };

            for (pair, result) in pairs.iter().zip(results) {
                match result {
                    Ok(result) => reports.push(pair_report(pair, result)),
                    Err(err) => {
                        tracing::warn!(
                            date = %pair.date,
                            doc_a = %pair.a.id(),
                            doc_b = %pair.b.id(),
                            error = %err,
                            "Pair comparison failed"
                        );
                        failures.push(pair_failure(pair, err.to_string()));
                    }
                }
            }
        }

        tracing::info!(
            pairs = reports.len() + failures.len(),
            failed = failures.len(),
            mode = %compare.mode,
            "Comparison finished"
        );

        Ok(ComparisonRun {
            grouping,
            reports,
            failures,
            mode: compare.mode,
        })
    }
}

/// Diff two documents and extract their signals.
pub fn compare_documents(
    differ: &Differ,
    names: &NameMatcher,
    a: &Document,
    b: &Document,
) -> Result<DiffResult, DiffError> {
    let diff = differ.diff(&a.text, &b.text)?;
    let signals = extract(&a.text, &b.text, names);

    Ok(DiffResult {
        fragment: diff.fragment,
        tokens_added: diff.tokens_added,
        tokens_removed: diff.tokens_removed,
        names: signals.names,
        snippets_a: signals.snippets_a,
        snippets_b: signals.snippets_b,
        numbers: signals.numbers,
    })
}

fn pair_report(pair: &ComparisonPair<'_>, result: DiffResult) -> PairReport {
    PairReport {
        date: pair.date,
        index: pair.index,
        doc_a: pair.a.id(),
        doc_b: pair.b.id(),
        stem_a: pair.a.stem(),
        stem_b: pair.b.stem(),
        result,
    }
}

fn pair_failure(pair: &ComparisonPair<'_>, reason: String) -> PairFailure {
    PairFailure {
        date: pair.date,
        index: pair.index,
        doc_a: pair.a.id(),
        doc_b: pair.b.id(),
        reason,
    }
}
