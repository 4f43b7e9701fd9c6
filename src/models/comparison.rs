//! Date groups, comparison modes and comparison pairs.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Document;

/// How comparison pairs are chosen inside a date group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMode {
    /// Earliest document against each later one.
    #[default]
    Baseline,
    /// Every unordered pair, earlier document first.
    Pairwise,
}

impl std::fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonMode::Baseline => write!(f, "baseline"),
            ComparisonMode::Pairwise => write!(f, "pairwise"),
        }
    }
}

impl FromStr for ComparisonMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "baseline" => Ok(ComparisonMode::Baseline),
            "pairwise" => Ok(ComparisonMode::Pairwise),
            _ => Err(format!("Unknown comparison mode: {}", s)),
        }
    }
}

/// Documents sharing one resolved date, ordered by modified time then path.
#[derive(Debug, Clone, Serialize)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub documents: Vec<Document>,
}

impl DateGroup {
    /// A group produces comparisons only with two or more members.
    pub fn is_active(&self) -> bool {
        self.documents.len() >= 2
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Output of the grouper: dated groups in ascending date order plus the
/// documents no date could be resolved for.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Grouping {
    pub groups: Vec<DateGroup>,
    pub unknown: Vec<Document>,
}

impl Grouping {
    /// Number of documents across all buckets.
    pub fn document_count(&self) -> usize {
        self.groups.iter().map(DateGroup::len).sum::<usize>() + self.unknown.len()
    }

    /// Groups with at least two members.
    pub fn active_groups(&self) -> impl Iterator<Item = &DateGroup> {
        self.groups.iter().filter(|g| g.is_active())
    }
}

/// An ordered pair of documents from the same date group.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonPair<'a> {
    /// Position of the pair in the group's plan.
    pub index: usize,
    pub date: NaiveDate,
    pub a: &'a Document,
    pub b: &'a Document,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("Pairwise".parse::<ComparisonMode>(), Ok(ComparisonMode::Pairwise));
        assert_eq!("baseline".parse::<ComparisonMode>(), Ok(ComparisonMode::Baseline));
        assert!("all".parse::<ComparisonMode>().is_err());
    }

    #[test]
    fn test_mode_serde_lowercase() {
        let json = serde_json::to_string(&ComparisonMode::Pairwise).unwrap();
        assert_eq!(json, "\"pairwise\"");
    }
}
