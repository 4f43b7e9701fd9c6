//! HTML rendering for the index and per-pair pages.

use crate::models::{Document, PairReport};
use crate::services::diff::escape_html;
use crate::services::ComparisonRun;

use super::WrittenPair;

const STYLE: &str = r#"body{font-family:system-ui,-apple-system,Segoe UI,Roboto,Helvetica,Arial,sans-serif;max-width:1100px;margin:24px auto;padding:0 16px;line-height:1.4}
h1,h2,h3{margin:0 0 12px}
code,pre{background:#f6f8fa;border:1px solid #e1e4e8;border-radius:6px;padding:8px;white-space:pre-wrap}
.summary{display:grid;grid-template-columns:repeat(2,minmax(0,1fr));gap:12px;margin:16px 0}
.kv{background:#fafafa;border:1px solid #eee;padding:8px 10px;border-radius:8px}
.add{background:#e6ffed;border:1px solid #b7ebc6;border-radius:3px;padding:0 2px;margin:0 1px}
.del{background:#ffebe9;border:1px solid #ffcecb;border-radius:3px;padding:0 2px;margin:0 1px;text-decoration:line-through}
small.mono{font-family:ui-monospace,SFMono-Regular,Menlo,Monaco,Consolas,"Liberation Mono","Courier New",monospace}
a{text-decoration:none;color:#0969da}
table{border-collapse:collapse;width:100%}
td,th{border-top:1px solid #eee;padding:6px 8px;text-align:left;vertical-align:top}
.badge{display:inline-block;background:#eef;border-radius:999px;padding:2px 8px;margin-left:6px;font-size:12px}
.muted{color:#6a737d}"#;

/// Wrap `body` in a standalone HTML document.
pub fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{}</title>\n<style>\n{}\n</style></head><body>\n{}\n</body></html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

fn dash_if_empty(s: String) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s
    }
}

/// Report page for one compared pair.
pub fn pair_page(report: &PairReport) -> String {
    let result = &report.result;
    let mut body = Vec::new();

    body.push(format!("<h1>Diff for {}</h1>", report.date));
    body.push("<div class='summary'>".to_string());
    body.push(format!(
        "<div class='kv'><b>Doc A</b><br><small class='mono'>{}</small></div>",
        escape_html(&report.doc_a)
    ));
    body.push(format!(
        "<div class='kv'><b>Doc B</b><br><small class='mono'>{}</small></div>",
        escape_html(&report.doc_b)
    ));
    body.push(format!("<div class='kv'><b>Tokens Added</b><br>{}</div>", result.tokens_added));
    body.push(format!("<div class='kv'><b>Tokens Removed</b><br>{}</div>", result.tokens_removed));
    body.push(format!(
        "<div class='kv'><b>Numbers Added</b><br>{}</div>",
        dash_if_empty(escape_html(&result.numbers.added.join(", ")))
    ));
    body.push(format!(
        "<div class='kv'><b>Numbers Removed</b><br>{}</div>",
        dash_if_empty(escape_html(&result.numbers.removed.join(", ")))
    ));
    body.push("</div>".to_string());

    if !result.names.is_empty() {
        body.push("<h2>Name Mentions</h2>".to_string());
        body.push(
            "<table><tr><th>Name</th><th>A Mentions</th><th>B Mentions</th><th>Change</th></tr>"
                .to_string(),
        );
        for mention in &result.names {
            body.push(format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:+}</td></tr>",
                escape_html(&mention.name),
                mention.count_a,
                mention.count_b,
                mention.delta()
            ));
        }
        body.push("</table>".to_string());

        body.push("<h2>Lines Near Names (A vs B)</h2>".to_string());
        body.push("<div class='summary'>".to_string());
        body.push(format!(
            "<div class='kv'><b>A</b><pre>{}</pre></div>",
            dash_if_empty(escape_html(&result.snippets_a.join("\n\n---\n\n")))
        ));
        body.push(format!(
            "<div class='kv'><b>B</b><pre>{}</pre></div>",
            dash_if_empty(escape_html(&result.snippets_b.join("\n\n---\n\n")))
        ));
        body.push("</div>".to_string());
    }

    body.push("<h2>Inline Word Diff</h2>".to_string());
    if result.is_identical() {
        body.push("<p class='muted'>No differences.</p>".to_string());
    }
    body.push(format!("<pre>{}</pre>", result.fragment));

    page(&format!("Diff {}", report.date), &body.join("\n"))
}

fn document_item(doc: &Document) -> String {
    format!("<li><small class='mono'>{}</small></li>", escape_html(&doc.id()))
}

/// Index page linking every written pair report.
pub fn index_page(run: &ComparisonRun, written: &[WrittenPair<'_>]) -> String {
    let grouping = &run.grouping;
    let mut body = Vec::new();

    body.push("<h1>Date-based Diff Index</h1>".to_string());
    body.push(format!(
        "<p>Total documents: <b>{}</b>. Dated groups: <b>{}</b>. Unknown date: <b>{}</b>. Mode: <b>{}</b>.</p>",
        grouping.document_count(),
        grouping.groups.len(),
        grouping.unknown.len(),
        run.mode
    ));

    for group in &grouping.groups {
        let noun = if group.len() == 1 { "doc" } else { "docs" };
        body.push(format!(
            "<h2>{} <span class='badge'>{} {}</span></h2>",
            group.date,
            group.len(),
            noun
        ));
        body.push("<ul>".to_string());
        body.extend(group.documents.iter().map(document_item));
        body.push("</ul>".to_string());

        if !group.is_active() {
            body.push("<p class='muted'>Single document, no comparison needed.</p>".to_string());
            continue;
        }

        let links: Vec<&WrittenPair<'_>> = written
            .iter()
            .filter(|w| w.report.date == group.date)
            .collect();
        if links.is_empty() {
            body.push(
                "<p class='muted'>No pair reports were written for this date.</p>".to_string(),
            );
            continue;
        }
        body.push("<ol>".to_string());
        for link in links {
            body.push(format!(
                "<li><a href='{}'>{} vs {}</a> <span class='badge'>+{} / -{}</span></li>",
                escape_html(&link.href),
                escape_html(&link.report.doc_a),
                escape_html(&link.report.doc_b),
                link.report.result.tokens_added,
                link.report.result.tokens_removed
            ));
        }
        body.push("</ol>".to_string());
    }

    if !grouping.unknown.is_empty() {
        body.push("<h2>Docs with Unknown Date</h2><ul>".to_string());
        body.extend(grouping.unknown.iter().map(document_item));
        body.push("</ul>".to_string());
    }

    page("Date-based Diff Index", &body.join("\n"))
}
