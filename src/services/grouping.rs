//! Partitioning documents into date groups.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{file_name, DateGroup, Document, DocumentInput, Grouping};
use crate::services::date::resolve_date;

/// Resolve the date of every input and build its [`Document`].
pub fn resolve_documents(inputs: Vec<DocumentInput>) -> Vec<Document> {
    inputs
        .into_iter()
        .map(|input| {
            let filename = file_name(&input.path);
            let date = resolve_date(&input.text, &filename, input.container_date.as_deref());
            match date {
                Some(d) => {
                    tracing::debug!(path = %input.path.display(), date = %d, "Resolved date")
                }
                None => tracing::debug!(path = %input.path.display(), "No date found"),
            }
            Document {
                path: input.path,
                text: input.text,
                date,
                modified: input.modified,
            }
        })
        .collect()
}

/// Partition documents by resolved date.
///
/// Groups come out in ascending date order, each sorted by modified time with
/// ties broken by path. Documents without a date go to `unknown`, sorted by
/// path. Every input ends up in exactly one bucket.
pub fn group(documents: Vec<Document>) -> Grouping {
    let mut dated: BTreeMap<NaiveDate, Vec<Document>> = BTreeMap::new();
    let mut unknown = Vec::new();

    for doc in documents {
        match doc.date {
            Some(date) => dated.entry(date).or_default().push(doc),
            None => unknown.push(doc),
        }
    }

    let groups = dated
        .into_iter()
        .map(|(date, mut documents)| {
            documents.sort_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.path.cmp(&b.path)));
            DateGroup { date, documents }
        })
        .collect();

    unknown.sort_by(|a, b| a.path.cmp(&b.path));

    Grouping { groups, unknown }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use std::path::PathBuf;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn doc(path: &str, date: Option<&str>, modified: i64) -> Document {
        Document {
            path: PathBuf::from(path),
            text: String::new(),
            date: date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            modified: at(modified),
        }
    }

    #[test]
    fn test_group_partitions_every_document() {
        let docs = vec![
            doc("a.txt", Some("2024-01-08"), 5),
            doc("b.txt", None, 1),
            doc("c.txt", Some("2023-12-15"), 2),
            doc("d.txt", Some("2024-01-08"), 3),
            doc("e.txt", None, 4),
        ];
        let grouping = group(docs);

        assert_eq!(grouping.document_count(), 5);
        assert_eq!(grouping.groups.len(), 2);
        assert_eq!(grouping.unknown.len(), 2);
    }

    #[test]
    fn test_groups_ascending_by_date() {
        let docs = vec![
            doc("a.txt", Some("2024-03-10"), 1),
            doc("b.txt", Some("2023-12-15"), 1),
            doc("c.txt", Some("2024-01-08"), 1),
        ];
        let dates: Vec<String> = group(docs).groups.iter().map(|g| g.date.to_string()).collect();
        assert_eq!(dates, vec!["2023-12-15", "2024-01-08", "2024-03-10"]);
    }

    #[test]
    fn test_members_sorted_by_modified_then_path() {
        let docs = vec![
            doc("z.txt", Some("2024-01-08"), 10),
            doc("b.txt", Some("2024-01-08"), 5),
            doc("a.txt", Some("2024-01-08"), 10),
        ];
        let grouping = group(docs);
        let order: Vec<String> = grouping.groups[0].documents.iter().map(|d| d.id()).collect();
        assert_eq!(order, vec!["b.txt", "a.txt", "z.txt"]);
    }

    #[test]
    fn test_unknown_sorted_by_path() {
        let docs = vec![doc("b.txt", None, 1), doc("a.txt", None, 2)];
        let grouping = group(docs);
        let order: Vec<String> = grouping.unknown.iter().map(|d| d.id()).collect();
        assert_eq!(order, vec!["a.txt", "b.txt"]);
        assert!(grouping.groups.is_empty());
    }

    #[test]
    fn test_resolve_documents_reads_text_then_filename() {
        let inputs = vec![
            DocumentInput::new("in/x_2024-01-08.txt", "Dated 03/10/2024", at(0)),
            DocumentInput::new("in/y_2024-01-08.txt", "no date", at(0)),
            DocumentInput::new("in/z.txt", "no date", at(0)).with_container_date("D:20200226"),
            DocumentInput::new("in/w.txt", "", at(0)),
        ];
        let docs = resolve_documents(inputs);
        let dates: Vec<Option<String>> = docs
            .iter()
            .map(|d| d.date.map(|x| x.to_string()))
            .collect();
        assert_eq!(
            dates,
            vec![
                Some("2024-03-10".to_string()),
                Some("2024-01-08".to_string()),
                Some("2020-02-26".to_string()),
                None,
            ]
        );
    }
}

/// Property-based tests for grouping
#[cfg(test)]
mod property_tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::path::PathBuf;

    // (day offset or none, modified seconds) per document
    fn documents() -> impl Strategy<Value = Vec<(Option<u32>, i64)>> {
        prop::collection::vec((prop::option::of(0u32..6), 0i64..5), 0..30)
    }

    fn build(specs: &[(Option<u32>, i64)]) -> Vec<Document> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        specs
            .iter()
            .enumerate()
            .map(|(i, (day, modified))| Document {
                path: PathBuf::from(format!("doc_{:02}.txt", i)),
                text: String::new(),
                date: day.map(|d| base + chrono::Days::new(d as u64)),
                modified: Utc.timestamp_opt(*modified, 0).unwrap(),
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_every_document_lands_in_one_bucket(specs in documents()) {
            let docs = build(&specs);
            let expected: HashSet<PathBuf> = docs.iter().map(|d| d.path.clone()).collect();
            let grouping = group(docs);

            prop_assert_eq!(grouping.document_count(), specs.len());
            let seen: HashSet<PathBuf> = grouping
                .groups
                .iter()
                .flat_map(|g| g.documents.iter())
                .chain(grouping.unknown.iter())
                .map(|d| d.path.clone())
                .collect();
            prop_assert_eq!(seen, expected);
        }

        #[test]
        fn prop_groups_are_ordered_and_consistent(specs in documents()) {
            let grouping = group(build(&specs));

            for pair in grouping.groups.windows(2) {
                prop_assert!(pair[0].date < pair[1].date);
            }
            for date_group in &grouping.groups {
                prop_assert!(!date_group.documents.is_empty());
                prop_assert!(date_group.documents.iter().all(|d| d.date == Some(date_group.date)));
                for pair in date_group.documents.windows(2) {
                    let (a, b) = (&pair[0], &pair[1]);
                    prop_assert!((a.modified, &a.path) <= (b.modified, &b.path));
                }
            }
            prop_assert!(grouping.unknown.iter().all(|d| d.date.is_none()));
        }
    }
}
