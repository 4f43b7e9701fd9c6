//! Token-level diff between two document texts.
//!
//! Text is split into tokens (runs of word characters, or single punctuation
//! characters; whitespace only separates). The two token sequences are aligned
//! with Myers' O(ND) algorithm in its linear-space divide-and-conquer form,
//! which yields a minimal edit script. The script is coalesced into
//! `equal` / `insert` / `delete` / `replace` opcodes and rendered as an inline
//! redline that follows document B, with deletions placed where the texts
//! diverge.
//!
//! Because the script is minimal, the number of matched tokens does not depend
//! on argument order, so `added(a, b) == removed(b, a)` always holds.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::DiffError;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+|[^\w\s]").expect("static pattern"));

/// A token and its byte span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Split text into tokens.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    TOKEN
        .find_iter(text)
        .map(|m| Token {
            text: m.as_str(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

/// Kind of an aligned span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    Equal,
    Insert,
    Delete,
    Replace,
}

/// A labeled span over token indices of A and B.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub a: Range<usize>,
    pub b: Range<usize>,
}

/// Result of diffing two texts.
#[derive(Debug, Clone)]
pub struct TokenDiff {
    /// HTML-escaped text of B with `<span class="add">` / `<span class="del">` markup.
    pub fragment: String,
    pub tokens_added: usize,
    pub tokens_removed: usize,
    pub opcodes: Vec<Opcode>,
}

/// Token differ with a size guard.
#[derive(Debug, Clone, Copy)]
pub struct Differ {
    max_tokens: usize,
}

impl Default for Differ {
    fn default() -> Self {
        Self {
            max_tokens: usize::MAX,
        }
    }
}

impl Differ {
    /// A differ that refuses documents with more than `max_tokens` tokens.
    pub fn new(max_tokens: usize) -> Self {
        Self { max_tokens }
    }

    /// Diff `text_a` against `text_b`.
    pub fn diff(&self, text_a: &str, text_b: &str) -> Result<TokenDiff, DiffError> {
        let tokens_a = tokenize(text_a);
        let tokens_b = tokenize(text_b);

        for (side, tokens) in [("A", &tokens_a), ("B", &tokens_b)] {
            if tokens.len() > self.max_tokens {
                return Err(DiffError::TooManyTokens {
                    side,
                    tokens: tokens.len(),
                    limit: self.max_tokens,
                });
            }
        }

        let words_a: Vec<&str> = tokens_a.iter().map(|t| t.text).collect();
        let words_b: Vec<&str> = tokens_b.iter().map(|t| t.text).collect();
        let opcodes = opcodes(&words_a, &words_b);

        let mut tokens_added = 0;
        let mut tokens_removed = 0;
        for op in &opcodes {
            match op.tag {
                OpTag::Equal => {}
                OpTag::Insert => tokens_added += op.b.len(),
                OpTag::Delete => tokens_removed += op.a.len(),
                OpTag::Replace => {
                    tokens_added += op.b.len();
                    tokens_removed += op.a.len();
                }
            }
        }

        let fragment = render(text_a, &tokens_a, text_b, &tokens_b, &opcodes);

        Ok(TokenDiff {
            fragment,
            tokens_added,
            tokens_removed,
            opcodes,
        })
    }
}

/// Diff two texts without a size limit.
pub fn diff(text_a: &str, text_b: &str) -> TokenDiff {
    match Differ::default().diff(text_a, text_b) {
        Ok(diff) => diff,
        // The default differ has no token limit.
        Err(_) => unreachable!("unbounded differ cannot fail"),
    }
}

/// Align two sequences and return coalesced opcodes.
///
/// Adjacent deletes and inserts between two equal runs become one `Replace`.
pub fn opcodes<T: PartialEq>(a: &[T], b: &[T]) -> Vec<Opcode> {
    let mut edits = Vec::new();
    let mut vf = V::new(a.len() + b.len());
    let mut vb = V::new(a.len() + b.len());
    conquer(a, 0..a.len(), b, 0..b.len(), &mut vf, &mut vb, &mut edits);
    coalesce(edits)
}

/// Elementary edit produced by the alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Equal { a: usize, b: usize, len: usize },
    Delete { a: usize, len: usize },
    Insert { b: usize, len: usize },
}

/// Furthest-reaching x per diagonal `k`, indexable by negative `k`.
struct V {
    offset: isize,
    v: Vec<usize>,
}

impl V {
    fn new(max_d: usize) -> Self {
        let offset = max_d as isize + 1;
        Self {
            offset,
            v: vec![0; 2 * max_d + 3],
        }
    }
}

impl std::ops::Index<isize> for V {
    type Output = usize;

    fn index(&self, k: isize) -> &usize {
        &self.v[(k + self.offset) as usize]
    }
}

impl std::ops::IndexMut<isize> for V {
    fn index_mut(&mut self, k: isize) -> &mut usize {
        &mut self.v[(k + self.offset) as usize]
    }
}

fn common_prefix_len<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix_len<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Find the start of the middle snake of an optimal path through the edit
/// graph of `a[ra]` and `b[rb]`.
///
/// The forward search stores x on diagonal `k = x - y`; the backward search
/// stores how far it got measured from the end of both ranges.
fn find_middle_snake<T: PartialEq>(
    a: &[T],
    ra: Range<usize>,
    b: &[T],
    rb: Range<usize>,
    vf: &mut V,
    vb: &mut V,
) -> Option<(usize, usize)> {
    let n = ra.len();
    let m = rb.len();
    let delta = n as isize - m as isize;
    let odd = delta & 1 == 1;

    vf[1] = 0;
    vb[1] = 0;

    let d_max = ((n + m + 1) / 2 + 1) as isize;
    for d in 0..d_max {
        // Forward pass.
        let mut k = d;
        while k >= -d {
            let mut x = if k == -d || (k != d && vf[k - 1] < vf[k + 1]) {
                vf[k + 1]
            } else {
                vf[k - 1] + 1
            };
            let y = (x as isize - k) as usize;
            let (x0, y0) = (x, y);
            if x < n && y < m {
                x += common_prefix_len(&a[ra.start + x..ra.end], &b[rb.start + y..rb.end]);
            }
            vf[k] = x;
            if odd
                && (k - delta).abs() <= d - 1
                && vf[k] + vb[-(k - delta)] >= n
                && x0 <= n
                && y0 <= m
            {
                return Some((ra.start + x0, rb.start + y0));
            }
            k -= 2;
        }

        // Backward pass.
        let mut k = d;
        while k >= -d {
            let mut x = if k == -d || (k != d && vb[k - 1] < vb[k + 1]) {
                vb[k + 1]
            } else {
                vb[k - 1] + 1
            };
            let mut y = (x as isize - k) as usize;
            if x < n && y < m {
                let advance =
                    common_suffix_len(&a[ra.start..ra.end - x], &b[rb.start..rb.end - y]);
                x += advance;
                y += advance;
            }
            vb[k] = x;
            if !odd && (k - delta).abs() <= d && vb[k] + vf[-(k - delta)] >= n && x <= n && y <= m {
                return Some((ra.start + n - x, rb.start + m - y));
            }
            k -= 2;
        }
    }

    None
}

fn conquer<T: PartialEq>(
    a: &[T],
    mut ra: Range<usize>,
    b: &[T],
    mut rb: Range<usize>,
    vf: &mut V,
    vb: &mut V,
    edits: &mut Vec<Edit>,
) {
    let prefix = common_prefix_len(&a[ra.clone()], &b[rb.clone()]);
    if prefix > 0 {
        edits.push(Edit::Equal {
            a: ra.start,
            b: rb.start,
            len: prefix,
        });
    }
    ra.start += prefix;
    rb.start += prefix;

    let suffix = common_suffix_len(&a[ra.clone()], &b[rb.clone()]);
    ra.end -= suffix;
    rb.end -= suffix;

    if ra.is_empty() && rb.is_empty() {
        // Nothing left between prefix and suffix.
    } else if rb.is_empty() {
        edits.push(Edit::Delete {
            a: ra.start,
            len: ra.len(),
        });
    } else if ra.is_empty() {
        edits.push(Edit::Insert {
            b: rb.start,
            len: rb.len(),
        });
    } else {
        match find_middle_snake(a, ra.clone(), b, rb.clone(), vf, vb) {
            // The split must fall strictly inside the box or recursion would
            // not shrink it.
            Some((x, y))
                if (ra.start..=ra.end).contains(&x)
                    && (rb.start..=rb.end).contains(&y)
                    && (x, y) != (ra.start, rb.start)
                    && (x, y) != (ra.end, rb.end) =>
            {
                conquer(a, ra.start..x, b, rb.start..y, vf, vb, edits);
                conquer(a, x..ra.end, b, y..rb.end, vf, vb, edits);
            }
            _ => {
                edits.push(Edit::Delete {
                    a: ra.start,
                    len: ra.len(),
                });
                edits.push(Edit::Insert {
                    b: rb.start,
                    len: rb.len(),
                });
            }
        }
    }

    if suffix > 0 {
        edits.push(Edit::Equal {
            a: ra.end,
            b: rb.end,
            len: suffix,
        });
    }
}

/// Merge elementary edits into opcodes.
///
/// Equal edits are merged when contiguous; everything between two equal runs
/// becomes a single insert, delete or replace.
fn coalesce(edits: Vec<Edit>) -> Vec<Opcode> {
    let mut ops: Vec<Opcode> = Vec::new();
    let mut a_pos = 0;
    let mut b_pos = 0;
    // Start of the pending non-equal run.
    let mut pending: Option<(usize, usize)> = None;

    fn flush(
        ops: &mut Vec<Opcode>,
        pending: &mut Option<(usize, usize)>,
        a_pos: usize,
        b_pos: usize,
    ) {
        if let Some((a0, b0)) = pending.take() {
            let tag = match (a_pos > a0, b_pos > b0) {
                (true, true) => OpTag::Replace,
                (true, false) => OpTag::Delete,
                (false, true) => OpTag::Insert,
                (false, false) => return,
            };
            ops.push(Opcode {
                tag,
                a: a0..a_pos,
                b: b0..b_pos,
            });
        }
    }

    for edit in edits {
        match edit {
            Edit::Equal { a, b, len } => {
                if len == 0 {
                    continue;
                }
                flush(&mut ops, &mut pending, a_pos, b_pos);
                match ops.last_mut() {
                    Some(last)
                        if last.tag == OpTag::Equal && last.a.end == a && last.b.end == b =>
                    {
                        last.a.end += len;
                        last.b.end += len;
                    }
                    _ => ops.push(Opcode {
                        tag: OpTag::Equal,
                        a: a..a + len,
                        b: b..b + len,
                    }),
                }
                a_pos = a + len;
                b_pos = b + len;
            }
            Edit::Delete { a, len } => {
                pending.get_or_insert((a_pos, b_pos));
                a_pos = a + len;
            }
            Edit::Insert { b, len } => {
                pending.get_or_insert((a_pos, b_pos));
                b_pos = b + len;
            }
        }
    }
    flush(&mut ops, &mut pending, a_pos, b_pos);

    ops
}

/// Render the redline following B's token order.
///
/// Whitespace between tokens is taken from B, so unchanged stretches read
/// exactly like B. Deleted A text is inserted at the point of divergence.
fn render(
    text_a: &str,
    tokens_a: &[Token<'_>],
    text_b: &str,
    tokens_b: &[Token<'_>],
    ops: &[Opcode],
) -> String {
    let mut out = String::with_capacity(text_b.len() + text_b.len() / 4);
    let mut cursor = 0;

    for op in ops {
        match op.tag {
            OpTag::Equal => {
                let end = tokens_b[op.b.end - 1].end;
                push_escaped(&mut out, &text_b[cursor..end]);
                cursor = end;
            }
            OpTag::Insert => {
                cursor = push_gap(&mut out, text_b, cursor, tokens_b[op.b.start].start);
                cursor = push_span(&mut out, "add", text_b, tokens_b, op.b.clone())
                    .unwrap_or(cursor);
            }
            OpTag::Delete => {
                if out.chars().next_back().is_some_and(|c| !c.is_whitespace()) {
                    out.push(' ');
                }
                push_span(&mut out, "del", text_a, tokens_a, op.a.clone());
            }
            OpTag::Replace => {
                cursor = push_gap(&mut out, text_b, cursor, tokens_b[op.b.start].start);
                push_span(&mut out, "del", text_a, tokens_a, op.a.clone());
                cursor = push_span(&mut out, "add", text_b, tokens_b, op.b.clone())
                    .unwrap_or(cursor);
            }
        }
    }
    push_escaped(&mut out, &text_b[cursor..]);

    out
}

/// Emit B's whitespace between `cursor` and the next token.
fn push_gap(out: &mut String, text_b: &str, cursor: usize, next: usize) -> usize {
    if next > cursor {
        push_escaped(out, &text_b[cursor..next]);
        next
    } else {
        cursor
    }
}

/// Emit a marked span covering `range` tokens and return its end offset.
fn push_span(
    out: &mut String,
    class: &str,
    text: &str,
    tokens: &[Token<'_>],
    range: Range<usize>,
) -> Option<usize> {
    if range.is_empty() {
        return None;
    }
    let start = tokens[range.start].start;
    let end = tokens[range.end - 1].end;
    out.push_str("<span class=\"");
    out.push_str(class);
    out.push_str("\">");
    push_escaped(out, &text[start..end]);
    out.push_str("</span>");
    Some(end)
}

/// Append `s` with HTML special characters escaped.
pub(crate) fn push_escaped(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
}

/// HTML-escape a string.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    push_escaped(&mut out, s);
    out
}


/// Property-based tests for the alignment
#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Length of the longest common subsequence, by dynamic programming.
    fn lcs_len(a: &[&str], b: &[&str]) -> usize {
        let mut row = vec![0usize; b.len() + 1];
        for x in a {
            let mut diag = 0;
            for (j, y) in b.iter().enumerate() {
                let above = row[j + 1];
                row[j + 1] = if x == y { diag + 1 } else { above.max(row[j]) };
                diag = above;
            }
        }
        row[b.len()]
    }

    fn matched(ops: &[Opcode]) -> usize {
        ops.iter()
            .filter(|o| o.tag == OpTag::Equal)
            .map(|o| o.a.len())
            .sum()
    }

    // A small vocabulary keeps the sequences full of repeats.
    fn words() -> impl Strategy<Value = Vec<&'static str>> {
        prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d", "12", "."]), 0..40)
    }

    proptest! {
        #[test]
        fn prop_alignment_is_minimal(a in words(), b in words()) {
            let ops = opcodes(&a, &b);
            prop_assert_eq!(matched(&ops), lcs_len(&a, &b));
        }

        #[test]
        fn prop_opcodes_cover_both_sides(a in words(), b in words()) {
            let ops = opcodes(&a, &b);
            let (mut a_end, mut b_end) = (0, 0);
            for op in &ops {
                prop_assert_eq!(op.a.start, a_end);
                prop_assert_eq!(op.b.start, b_end);
                if op.tag == OpTag::Equal {
                    prop_assert_eq!(&a[op.a.clone()], &b[op.b.clone()]);
                }
                a_end = op.a.end;
                b_end = op.b.end;
            }
            prop_assert_eq!((a_end, b_end), (a.len(), b.len()));
        }

        #[test]
        fn prop_counts_are_symmetric(a in words(), b in words()) {
            let (text_a, text_b) = (a.join(" "), b.join(" "));
            let ab = diff(&text_a, &text_b);
            let ba = diff(&text_b, &text_a);
            prop_assert_eq!(ab.tokens_added, ba.tokens_removed);
            prop_assert_eq!(ab.tokens_removed, ba.tokens_added);

            let common = lcs_len(&a, &b);
            prop_assert_eq!(ab.tokens_added, b.len() - common);
            prop_assert_eq!(ab.tokens_removed, a.len() - common);
        }
    }
}
