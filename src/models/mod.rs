//! Domain models for the comparison pipeline.

mod comparison;
mod document;
mod report;
mod rules;

pub use comparison::{ComparisonMode, ComparisonPair, DateGroup, Grouping};
pub(crate) use document::{file_name, file_stem};
pub use document::{Document, DocumentInput};
pub use report::{DiffResult, NameMention, NumericDelta, PairFailure, PairReport};
pub use rules::{CategoryRules, Classification, LawMatch, LawRule, RuleTable, WeightedPattern};
