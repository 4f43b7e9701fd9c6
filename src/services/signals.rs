//! Signals that make a diff reviewable: tracked-name mentions, the lines
//! around them, and numbers that appear on only one side.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{NameMention, NumericDelta};

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[0-9]+(?:\.[0-9]+)?\b").expect("static pattern"));

/// Signals computed for one pair of documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signals {
    pub names: Vec<NameMention>,
    pub snippets_a: Vec<String>,
    pub snippets_b: Vec<String>,
    pub numbers: NumericDelta,
}

/// Compiled matchers for the tracked-name list.
///
/// Names match case-insensitively as whole words; a multi-word name matches
/// as a phrase, with any run of whitespace between its words.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    names: Vec<(String, Regex)>,
    any: Option<Regex>,
}

impl NameMatcher {
    /// Compile matchers for `names`. Blank names are ignored.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self, regex::Error> {
        let mut compiled = Vec::new();
        let mut fragments = Vec::new();

        for name in names {
            let name = name.as_ref();
            let Some(fragment) = name_pattern(name) else {
                continue;
            };
            compiled.push((name.to_string(), Regex::new(&format!("(?i){}", fragment))?));
            fragments.push(format!("(?:{})", fragment));
        }

        let any = if fragments.is_empty() {
            None
        } else {
            Some(Regex::new(&format!("(?i){}", fragments.join("|")))?)
        };

        Ok(Self {
            names: compiled,
            any,
        })
    }

    /// Tracked names, in configured order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Mention table for a pair.
    pub fn mentions(&self, text_a: &str, text_b: &str) -> Vec<NameMention> {
        self.names
            .iter()
            .map(|(name, re)| NameMention {
                name: name.clone(),
                count_a: re.find_iter(text_a).count(),
                count_b: re.find_iter(text_b).count(),
            })
            .collect()
    }

    /// Three-line windows around every line mentioning any tracked name.
    ///
    /// Windows are clamped at the start and end of the document and trimmed.
    /// Overlapping windows are kept as-is.
    pub fn snippets(&self, text: &str) -> Vec<String> {
        let Some(any) = &self.any else {
            return Vec::new();
        };

        let lines: Vec<&str> = text.lines().collect();
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| any.is_match(line))
            .map(|(i, _)| {
                let start = i.saturating_sub(1);
                let end = (i + 1).min(lines.len() - 1);
                lines[start..=end].join("\n").trim().to_string()
            })
            .collect()
    }
}

/// Regex fragment for one name, or `None` for a blank name.
///
/// Word boundaries are only added on sides where the name starts or ends with
/// a word character, so names like `Dr.` still match.
fn name_pattern(name: &str) -> Option<String> {
    let name = name.trim();
    let first = name.chars().next()?;
    let last = name.chars().next_back()?;

    let body = name
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");

    let lead = if is_word_char(first) { r"\b" } else { "" };
    let trail = if is_word_char(last) { r"\b" } else { "" };
    Some(format!("{}{}{}", lead, body, trail))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Distinct numeric literals in `text`.
pub fn numbers_in(text: &str) -> BTreeSet<&str> {
    NUMBER.find_iter(text).map(|m| m.as_str()).collect()
}

/// Numbers present only in B (`added`) and only in A (`removed`).
pub fn numeric_delta(text_a: &str, text_b: &str) -> NumericDelta {
    let in_a = numbers_in(text_a);
    let in_b = numbers_in(text_b);

    NumericDelta {
        added: sorted_numbers(in_b.difference(&in_a).copied()),
        removed: sorted_numbers(in_a.difference(&in_b).copied()),
    }
}

/// Sort by length first so short, common numbers lead.
fn sorted_numbers<'a>(numbers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = numbers.map(str::to_string).collect();
    out.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    out
}

/// Compute all signals for a pair.
pub fn extract(text_a: &str, text_b: &str, names: &NameMatcher) -> Signals {
    Signals {
        names: names.mentions(text_a, text_b),
        snippets_a: names.snippets(text_a),
        snippets_b: names.snippets(text_b),
        numbers: numeric_delta(text_a, text_b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(names: &[&str]) -> NameMatcher {
        NameMatcher::new(names).unwrap()
    }

    fn counts(m: &NameMatcher, text: &str) -> Vec<usize> {
        m.mentions(text, "").iter().map(|n| n.count_a).collect()
    }

    #[test]
    fn test_name_delta() {
        let signals = extract(
            "Noel Johnson was present",
            "Neil Johnson was present",
            &matcher(&["Noel"]),
        );
        let noel = &signals.names[0];
        assert_eq!(noel.count_a, 1);
        assert_eq!(noel.count_b, 0);
        assert_eq!(noel.delta(), -1);
    }

    #[test]
    fn test_name_match_is_case_insensitive_whole_word() {
        let m = matcher(&["Noel"]);
        assert_eq!(counts(&m, "NOEL, noel and Noel's"), vec![3]);
        assert_eq!(counts(&m, "Noelle and Christmas-Noeling"), vec![0]);
    }

    #[test]
    fn test_multi_word_name_is_a_phrase() {
        let m = matcher(&["Andy Maki"]);
        assert_eq!(counts(&m, "Det. Andy Maki; andy\nmaki; Andy and Maki"), vec![2]);
    }

    #[test]
    fn test_name_with_trailing_punctuation() {
        let m = matcher(&["Dr."]);
        assert_eq!(counts(&m, "Dr. Verde and Dr. Russell"), vec![2]);
    }

    #[test]
    fn test_duplicate_names_are_kept_in_order() {
        let m = matcher(&["Verde", "Noel", "Verde"]);
        let names: Vec<&str> = m.names().collect();
        assert_eq!(names, vec!["Verde", "Noel", "Verde"]);
    }

    #[test]
    fn test_empty_name_list() {
        let empty: [&str; 0] = [];
        let m = NameMatcher::new(&empty).unwrap();
        assert!(m.is_empty());
        let signals = extract("Noel 1", "Neil 2", &m);
        assert!(signals.names.is_empty());
        assert!(signals.snippets_a.is_empty());
        assert!(signals.snippets_b.is_empty());
        assert_eq!(signals.numbers.added, vec!["2"]);
    }

    #[test]
    fn test_blank_names_ignored() {
        let m = matcher(&["  ", "", "Noel"]);
        assert_eq!(m.names().count(), 1);
    }

    #[test]
    fn test_snippets_three_line_window() {
        let text = "line one\nline two\nNoel spoke\nline four\nline five";
        let m = matcher(&["Noel"]);
        assert_eq!(m.snippets(text), vec!["line two\nNoel spoke\nline four"]);
    }

    #[test]
    fn test_snippets_clamped_at_boundaries() {
        let text = "Noel first\nmiddle\nlast Verde";
        let m = matcher(&["Noel", "Verde"]);
        assert_eq!(
            m.snippets(text),
            vec!["Noel first\nmiddle", "middle\nlast Verde"]
        );
    }

    #[test]
    fn test_snippets_overlapping_windows_duplicate_lines() {
        let text = "Noel\nVerde\nend";
        let m = matcher(&["Noel", "Verde"]);
        assert_eq!(m.snippets(text), vec!["Noel\nVerde", "Noel\nVerde\nend"]);
    }

    #[test]
    fn test_numeric_delta() {
        let delta = numeric_delta("12 digital photographs", "8 digital photographs");
        assert_eq!(delta.added, vec!["8"]);
        assert_eq!(delta.removed, vec!["12"]);
    }

    #[test]
    fn test_numeric_delta_is_set_based_and_sorted() {
        let delta = numeric_delta(
            "age 34, age 34, locker 247",
            "age 34, 1023, 5, 3.5, 100, 247",
        );
        assert_eq!(delta.added, vec!["5", "100", "3.5", "1023"]);
        assert!(delta.removed.is_empty());
    }

    #[test]
    fn test_numbers_in_splits_on_punctuation() {
        let numbers: Vec<&str> = numbers_in("Incident #: 2023-456789 at 14:30")
            .into_iter()
            .collect();
        assert_eq!(numbers, vec!["14", "2023", "30", "456789"]);
    }
}
