//! docket-diff - date-grouped tamper detection for case documents
//!
//! Groups a corpus of documents by the date they describe, diffs the
//! documents sharing a date at the word level, and writes redline reports
//! that highlight changed names and numbers.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod report;
pub mod services;
pub mod source;
