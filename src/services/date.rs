//! Canonical date resolution for documents.
//!
//! Sources are tried in a fixed order and the first valid hit wins:
//! body text, then file name, then the container creation date. Signals from
//! different sources are never combined.
//!
//! Inside each source the patterns are tried in priority order and only the
//! first match of a pattern is considered. A match that is not a real calendar
//! date (e.g. `02/30/2024`) counts as no match, and resolution moves on to the
//! next pattern.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `M/D/YYYY` or `M-D-YYYY`.
static TEXT_NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(0?[1-9]|1[0-2])[/\-](0?[1-9]|[12][0-9]|3[01])[/\-](20[0-9]{2}|19[0-9]{2})\b")
        .expect("static pattern")
});

/// `Month D, YYYY` with the full English month name.
static TEXT_LONG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(January|February|March|April|May|June|July|August|September|October|November|December)\s+([12]?[0-9]|3[01]),\s*(20[0-9]{2}|19[0-9]{2})\b",
    )
    .expect("static pattern")
});

/// `YYYY-MM-DD`.
static TEXT_ISO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(20[0-9]{2}|19[0-9]{2})-(0?[1-9]|1[0-2])-(0?[1-9]|[12][0-9]|3[01])\b")
        .expect("static pattern")
});

// File names use `_` as a separator, which `\b` treats as part of a word, so
// the filename patterns are bounded by "not a digit" instead.

/// `MM.DD.YY`, `MM-DD-YY`, `M.D.YYYY`.
static FILENAME_US: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^0-9])(0?[1-9]|1[0-2])[.\-](0?[1-9]|[12][0-9]|3[01])[.\-]((?:20)?[0-9]{2})(?:[^0-9]|$)")
        .expect("static pattern")
});

/// `YYYY-MM-DD` or `YYYY_MM_DD`.
static FILENAME_ISO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^0-9])(20[0-9]{2}|19[0-9]{2})[-_](0?[1-9]|1[0-2])[-_](0?[1-9]|[12][0-9]|3[01])(?:[^0-9]|$)")
        .expect("static pattern")
});

/// Leading `YYYYMMDD` of a PDF-style `D:YYYYMMDDHHmmSS` creation date.
static CONTAINER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{4})([0-9]{2})([0-9]{2})").expect("static pattern"));

/// Which source a resolved date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Text,
    Filename,
    Container,
}

impl std::fmt::Display for DateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateSource::Text => write!(f, "text"),
            DateSource::Filename => write!(f, "filename"),
            DateSource::Container => write!(f, "container"),
        }
    }
}

/// Resolve the canonical date of a document.
///
/// Returns `None` when no source yields a valid calendar date.
pub fn resolve_date(text: &str, filename: &str, container_date: Option<&str>) -> Option<NaiveDate> {
    resolve_date_with_source(text, filename, container_date).map(|(date, _)| date)
}

/// Like [`resolve_date`], but also reports which source won.
pub fn resolve_date_with_source(
    text: &str,
    filename: &str,
    container_date: Option<&str>,
) -> Option<(NaiveDate, DateSource)> {
    if let Some(date) = date_from_text(text) {
        return Some((date, DateSource::Text));
    }
    if let Some(date) = date_from_filename(filename) {
        return Some((date, DateSource::Filename));
    }
    container_date
        .and_then(date_from_container)
        .map(|date| (date, DateSource::Container))
}

/// First valid date in the body text, by pattern priority.
pub fn date_from_text(text: &str) -> Option<NaiveDate> {
    first_valid(&TEXT_NUMERIC, text, |c| ymd(&c[3], &c[1], &c[2]))
        .or_else(|| first_valid(&TEXT_LONG, text, |c| ymd_named(&c[3], &c[1], &c[2])))
        .or_else(|| first_valid(&TEXT_ISO, text, |c| ymd(&c[1], &c[2], &c[3])))
}

/// First valid date in the file name, by pattern priority.
pub fn date_from_filename(filename: &str) -> Option<NaiveDate> {
    first_valid(&FILENAME_US, filename, |c| {
        let year = &c[3];
        if year.len() == 2 {
            ymd(&format!("20{}", year), &c[1], &c[2])
        } else {
            ymd(year, &c[1], &c[2])
        }
    })
    .or_else(|| first_valid(&FILENAME_ISO, filename, |c| ymd(&c[1], &c[2], &c[3])))
}

/// Date from a container creation string such as `D:20231215093000`.
pub fn date_from_container(raw: &str) -> Option<NaiveDate> {
    first_valid(&CONTAINER, raw, |c| ymd(&c[1], &c[2], &c[3]))
}

/// Convert the first match of `re` only; later matches are never consulted.
fn first_valid<F>(re: &Regex, haystack: &str, convert: F) -> Option<NaiveDate>
where
    F: Fn(&Captures<'_>) -> Option<NaiveDate>,
{
    re.captures(haystack).and_then(|caps| convert(&caps))
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn ymd_named(year: &str, month_name: &str, day: &str) -> Option<NaiveDate> {
    let month = month_number(month_name)?;
    ymd(year, &month.to_string(), day)
}

fn month_number(name: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    MONTHS
        .iter()
        .position(|m| *m == name)
        .map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_text_numeric_slash() {
        assert_eq!(date_from_text("Filed 3/10/2024 by clerk"), Some(date("2024-03-10")));
    }

    #[test]
    fn test_text_numeric_hyphen() {
        assert_eq!(date_from_text("on 12-15-2023."), Some(date("2023-12-15")));
    }

    #[test]
    fn test_text_long_form() {
        assert_eq!(
            date_from_text("Date: December 15, 2023\nIncident"),
            Some(date("2023-12-15"))
        );
    }

    #[test]
    fn test_text_iso() {
        assert_eq!(date_from_text("logged 2024-01-08 at noon"), Some(date("2024-01-08")));
    }

    #[test]
    fn test_text_pattern_priority_beats_position() {
        // The long form appears first in the text, but the numeric pattern has
        // priority.
        let text = "Date: January 8, 2024\nReceived 02/01/2024";
        assert_eq!(date_from_text(text), Some(date("2024-02-01")));
    }

    #[test]
    fn test_text_first_match_only() {
        // The first numeric match is invalid; the later valid one is not used.
        let text = "02/30/2024 then 03/01/2024";
        assert_eq!(date_from_text(text), None);
    }

    #[test]
    fn test_text_invalid_falls_through_to_next_pattern() {
        let text = "02/30/2024 and later January 8, 2024";
        assert_eq!(date_from_text(text), Some(date("2024-01-08")));
    }

    #[test]
    fn test_long_form_day_zero_is_invalid() {
        assert_eq!(date_from_text("March 0, 2024"), None);
    }

    #[test]
    fn test_filename_two_digit_year() {
        assert_eq!(
            date_from_filename("PoliceReport_12.15.23_Original.txt"),
            Some(date("2023-12-15"))
        );
    }

    #[test]
    fn test_filename_four_digit_year() {
        assert_eq!(
            date_from_filename("CPS_Report_01.08.2024_Initial.txt"),
            Some(date("2024-01-08"))
        );
    }

    #[test]
    fn test_filename_iso_underscores() {
        assert_eq!(date_from_filename("scan_2024_02_15.pdf"), Some(date("2024-02-15")));
    }

    #[test]
    fn test_filename_iso_hyphens() {
        assert_eq!(date_from_filename("2024-01-08-notes.txt"), Some(date("2024-01-08")));
    }

    #[test]
    fn test_filename_without_date() {
        assert_eq!(date_from_filename("statement_final.txt"), None);
    }

    #[test]
    fn test_container_date() {
        assert_eq!(date_from_container("D:20231215093000-05'00'"), Some(date("2023-12-15")));
        assert_eq!(date_from_container("D:20231315"), None);
        assert_eq!(date_from_container("unknown"), None);
    }

    #[test]
    fn test_text_wins_over_filename() {
        let resolved =
            resolve_date_with_source("Hearing set 03/10/2024.", "report_2024-01-08.txt", None);
        assert_eq!(resolved, Some((date("2024-03-10"), DateSource::Text)));
    }

    #[test]
    fn test_invalid_text_date_falls_back_to_filename() {
        let resolved = resolve_date("Signed 02/30/2024", "scan_2024_02_15.txt", None);
        assert_eq!(resolved, Some(date("2024-02-15")));
    }

    #[test]
    fn test_container_used_last() {
        let resolved =
            resolve_date_with_source("no dates here", "notes.pdf", Some("D:20200226120000"));
        assert_eq!(resolved, Some((date("2020-02-26"), DateSource::Container)));
    }

    #[test]
    fn test_unresolved() {
        assert_eq!(resolve_date("", "notes.txt", None), None);
    }

    #[test]
    fn test_quoted_prior_incident_date_wins_over_filing_date() {
        // Adversarial: the body quotes an earlier incident before the filing
        // date. Text precedence still picks the quoted date, not the filename.
        let text = "Re: incident of 11/02/2023 previously reported.\nFiled: January 8, 2024";
        let resolved = resolve_date(text, "Filing_2024-01-08.txt", None);
        assert_eq!(resolved, Some(date("2023-11-02")));
    }
}
