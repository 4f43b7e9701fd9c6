//! Rule tables for document classification and legal keyword scoring.
//!
//! The tables are plain data so they can come from configuration; the
//! scoring lives in [`crate::services::classify`].

use serde::{Deserialize, Serialize};

/// A regex pattern and the score it contributes when it matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedPattern {
    pub pattern: String,
    pub weight: f64,
}

impl WeightedPattern {
    pub fn new(pattern: &str, weight: f64) -> Self {
        Self {
            pattern: pattern.to_string(),
            weight,
        }
    }
}

/// Patterns voting for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRules {
    pub name: String,
    /// Matched against the lowercased document text.
    #[serde(default)]
    pub patterns: Vec<WeightedPattern>,
    /// Matched against the lowercased file name, scaled by `filename_weight`.
    #[serde(default)]
    pub filename_patterns: Vec<WeightedPattern>,
}

/// Externally supplied classification table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTable {
    pub categories: Vec<CategoryRules>,
    /// Multiplier applied to filename pattern weights.
    pub filename_weight: f64,
    /// Raw scores are divided by this to get a 0..1 confidence.
    pub confidence_scale: f64,
    /// Below this confidence the fallback category is used.
    pub min_confidence: f64,
    pub fallback_category: String,
}

impl Default for RuleTable {
    fn default() -> Self {
        fn category(name: &str, text: &[(&str, f64)], file: &[(&str, f64)]) -> CategoryRules {
            CategoryRules {
                name: name.to_string(),
                patterns: text.iter().map(|(p, w)| WeightedPattern::new(p, *w)).collect(),
                filename_patterns: file.iter().map(|(p, w)| WeightedPattern::new(p, *w)).collect(),
            }
        }

        Self {
            categories: vec![
                category(
                    "Primary",
                    &[
                        ("police report|incident report|investigation report", 0.9),
                        ("medical exam|forensic exam|nurse exam|physical exam", 0.9),
                        ("witness statement|sworn statement|affidavit", 0.8),
                        ("child protective services|cps report|abuse report", 0.9),
                        ("interview recording|recorded statement", 0.8),
                        ("photographic evidence|photo documentation", 0.7),
                        ("medical records|hospital records|doctor", 0.7),
                        ("investigative summary|detective notes", 0.8),
                    ],
                    &[
                        ("police|report|incident|investigation", 0.8),
                        ("medical|exam|forensic|nurse", 0.8),
                        ("statement|witness|affidavit", 0.7),
                        ("cps|protective|abuse", 0.8),
                    ],
                ),
                category(
                    "Supporting",
                    &[
                        ("court order|judicial order|court document", 0.7),
                        ("legal brief|motion|filing", 0.6),
                        ("correspondence|letter|email", 0.5),
                        ("school records|educational records", 0.6),
                        ("social services|family services", 0.6),
                        ("background check|criminal history", 0.6),
                        ("timeline|chronology|summary", 0.5),
                    ],
                    &[
                        ("court|order|motion|filing", 0.6),
                        ("letter|email|correspondence", 0.5),
                        ("school|education|records", 0.6),
                        ("background|history|check", 0.5),
                    ],
                ),
                category(
                    "External",
                    &[
                        ("news article|newspaper|media report", 0.8),
                        ("research paper|study|academic", 0.7),
                        ("policy document|guidelines|standards", 0.6),
                        ("training materials|educational", 0.5),
                        ("public records|foia|freedom of information", 0.7),
                    ],
                    &[
                        ("news|article|media|press", 0.8),
                        ("research|study|academic", 0.7),
                        ("policy|guideline|standard", 0.6),
                        ("public|foia|freedom", 0.6),
                    ],
                ),
                category(
                    "No",
                    &[
                        ("notice of hearing|hearing notice|scheduling", 0.9),
                        ("calendar notice|docket|case schedule", 0.8),
                        ("administrative notice|procedural notice", 0.8),
                        ("form.*blank|template|sample", 0.7),
                        ("duplicate|copy.*copy|redundant", 0.8),
                    ],
                    &[
                        ("notice|hearing|schedule|calendar", 0.8),
                        ("form|template|blank|sample", 0.7),
                        ("duplicate|copy", 0.8),
                    ],
                ),
            ],
            filename_weight: 0.7,
            confidence_scale: 3.0,
            min_confidence: 0.3,
            fallback_category: "Supporting".to_string(),
        }
    }
}

/// Keywords whose presence suggests a given law may be relevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LawRule {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Result of classifying one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub category: String,
    pub confidence: f64,
    pub reasoning: String,
}

/// A law whose keywords were found in a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LawMatch {
    pub law: String,
    pub confidence: f64,
    pub matched_keywords: Vec<String>,
    pub has_violation_context: bool,
}
