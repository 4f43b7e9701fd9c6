//! Per-pair comparison results.

use chrono::NaiveDate;
use serde::Serialize;

/// Mention counts of one tracked name in both documents of a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameMention {
    pub name: String,
    pub count_a: usize,
    pub count_b: usize,
}

impl NameMention {
    /// Signed change from A to B.
    pub fn delta(&self) -> i64 {
        self.count_b as i64 - self.count_a as i64
    }
}

/// Numeric literals present in only one side of a pair.
///
/// Both lists are sorted by (length, lexicographic).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NumericDelta {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// Everything computed for one comparison pair.
#[derive(Debug, Clone, Serialize)]
pub struct DiffResult {
    /// Inline redline markup (HTML-escaped text with add/del spans).
    #[serde(skip)]
    pub fragment: String,
    pub tokens_added: usize,
    pub tokens_removed: usize,
    /// One entry per tracked name, in tracked-name order.
    pub names: Vec<NameMention>,
    pub snippets_a: Vec<String>,
    pub snippets_b: Vec<String>,
    pub numbers: NumericDelta,
}

impl DiffResult {
    /// True when the token diff found no change at all.
    pub fn is_identical(&self) -> bool {
        self.tokens_added == 0 && self.tokens_removed == 0
    }
}

/// A successfully compared pair, as handed to the report emitter.
#[derive(Debug, Clone, Serialize)]
pub struct PairReport {
    pub date: NaiveDate,
    /// Position within the date group's plan.
    pub index: usize,
    pub doc_a: String,
    pub doc_b: String,
    #[serde(skip)]
    pub stem_a: String,
    #[serde(skip)]
    pub stem_b: String,
    #[serde(flatten)]
    pub result: DiffResult,
}

/// A pair whose comparison failed. Logged and left out of the artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct PairFailure {
    pub date: NaiveDate,
    pub index: usize,
    pub doc_a: String,
    pub doc_b: String,
    pub reason: String,
}
