//! Rule-based document classification and legal keyword scoring.

use regex::{Regex, RegexBuilder};

use crate::error::AppError;
use crate::models::{Classification, LawMatch, LawRule, RuleTable, WeightedPattern};

/// Words suggesting a keyword hit describes an actual violation.
const VIOLATION_INDICATORS: [&str; 9] = [
    "violation",
    "violated",
    "breach",
    "failed to",
    "improper",
    "unlawful",
    "illegal",
    "misconduct",
    "negligence",
];

const VIOLATION_BOOST: f64 = 0.3;

struct CompiledPattern {
    source: String,
    regex: Regex,
    weight: f64,
}

struct CompiledCategory {
    name: String,
    text: Vec<CompiledPattern>,
    filename: Vec<CompiledPattern>,
}

/// A [`RuleTable`] with every pattern compiled.
///
/// Build once per run and reuse it for every document.
pub struct Classifier {
    categories: Vec<CompiledCategory>,
    filename_weight: f64,
    confidence_scale: f64,
    min_confidence: f64,
    fallback_category: String,
}

impl Classifier {
    pub fn new(table: &RuleTable) -> Result<Self, AppError> {
        let mut categories = Vec::with_capacity(table.categories.len());
        for category in &table.categories {
            categories.push(CompiledCategory {
                name: category.name.clone(),
                text: compile_patterns(&category.patterns)?,
                filename: compile_patterns(&category.filename_patterns)?,
            });
        }

        Ok(Self {
            categories,
            filename_weight: table.filename_weight,
            confidence_scale: table.confidence_scale,
            min_confidence: table.min_confidence,
            fallback_category: table.fallback_category.clone(),
        })
    }

    /// Score every category against the text and file name.
    ///
    /// The highest score wins, with the earlier category winning ties.
    pub fn classify(&self, text: &str, filename: &str) -> Classification {
        let mut best: Option<(&CompiledCategory, f64, Vec<String>)> = None;

        for category in &self.categories {
            let mut score = 0.0;
            let mut matched = Vec::new();

            for pattern in &category.text {
                if pattern.regex.is_match(text) {
                    score += pattern.weight;
                    matched.push(format!("text: {}", pattern.source));
                }
            }
            for pattern in &category.filename {
                if pattern.regex.is_match(filename) {
                    score += pattern.weight * self.filename_weight;
                    matched.push(format!("filename: {}", pattern.source));
                }
            }

            if best.as_ref().map_or(true, |(_, s, _)| score > *s) {
                best = Some((category, score, matched));
            }
        }

        let (category, score, matched) = match best {
            Some((category, score, matched)) => (category.name.clone(), score, matched),
            None => (self.fallback_category.clone(), 0.0, Vec::new()),
        };

        let confidence = if self.confidence_scale > 0.0 {
            (score / self.confidence_scale).min(1.0)
        } else {
            0.0
        };

        if confidence < self.min_confidence {
            return Classification {
                category: self.fallback_category.clone(),
                confidence: self.min_confidence,
                reasoning: format!("Low confidence, defaulted to {}", self.fallback_category),
            };
        }

        let reasoning = if matched.is_empty() {
            "Default classification based on general content".to_string()
        } else {
            format!("Matched patterns: {}", matched.join("; "))
        };

        Classification {
            category,
            confidence,
            reasoning,
        }
    }
}

/// Classify one document against `table`.
pub fn classify(text: &str, filename: &str, table: &RuleTable) -> Result<Classification, AppError> {
    Ok(Classifier::new(table)?.classify(text, filename))
}

/// Score each law by the share of its keywords found in the text.
///
/// Keywords match case-insensitively as whole words. Laws without hits are
/// omitted; the rest are sorted by confidence, highest first.
pub fn detect_laws(text: &str, laws: &[LawRule]) -> Result<Vec<LawMatch>, AppError> {
    let lowered = text.to_lowercase();
    let has_violation_context = VIOLATION_INDICATORS.iter().any(|w| lowered.contains(w));

    let mut matches = Vec::new();
    for law in laws {
        if law.keywords.is_empty() {
            continue;
        }

        let mut matched_keywords = Vec::new();
        for keyword in &law.keywords {
            let re = case_insensitive(&format!(r"\b{}\b", regex::escape(keyword)))?;
            if re.is_match(text) {
                matched_keywords.push(keyword.clone());
            }
        }
        if matched_keywords.is_empty() {
            continue;
        }

        let mut confidence = (matched_keywords.len() as f64 / law.keywords.len() as f64).min(1.0);
        if has_violation_context {
            confidence = (confidence + VIOLATION_BOOST).min(1.0);
        }

        matches.push(LawMatch {
            law: law.name.clone(),
            confidence,
            matched_keywords,
            has_violation_context,
        });
    }

    matches.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    Ok(matches)
}

fn compile_patterns(patterns: &[WeightedPattern]) -> Result<Vec<CompiledPattern>, AppError> {
    let mut compiled = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        compiled.push(CompiledPattern {
            source: pattern.pattern.clone(),
            regex: case_insensitive(&pattern.pattern)?,
            weight: pattern.weight,
        });
    }
    Ok(compiled)
}

fn case_insensitive(pattern: &str) -> Result<Regex, AppError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| AppError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}
