// src/specs/shift.rs
//! Spec for one shift-group page (`shiftNNNN.html`).
//!
//! Layout:
//! ```text
//! <div class="shift__header">
//!   <span class="shift__header_item">SOURCE</span>
//!   <span class="shift__header_item">→</span>
//!   <span class="shift__header_item">TARGET</span>
//!   <span class="realization_number">3 realizations</span>
//! </div>
//! <table class="realization__table">        (one per realization)
//!   <th>[<span>status</span>] Realization 1</th>
//!   <tr><td colspan="2">Type</td><td>Polysemy</td></tr>
//!   <tr><td colspan="2">Language 1</td><td>Russian</td></tr>
//!   <tr><td colspan="2">Lexeme</td><td>glaz</td></tr>
//!   <tr><td>Meaning 1</td><td>eye</td><td>…</td></tr>
//!   <tr><td>Direction</td><td>→</td><td>…</td></tr>
//! </table>
//! ```
//! Rows are identified by the label in their first cell, never by position.

use crate::config::consts::{
    HEADER_CLASS, HEADER_ITEM_CLASS, REALIZATION_COUNT_CLASS, REALIZATION_TABLE_CLASS,
};
use crate::core::html::{blocks_with_class, inner_after_open_tag, row_cells, tag_blocks};
use crate::core::sanitize::cell_text;
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShiftHeader {
    /// Raw, trimmed: concept registry keys.
    pub source: String,
    pub direction: String,
    pub target: String,
    pub realizations: u32,
}

/// A labelled value: `("Language 1", "Russian")`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Labeled {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fragment {
    /// 1-based position among the page's realization tables.
    pub index: usize,
    pub title: String,
    pub status: String,
    pub kind: String,
    /// Raw, trimmed language names (registry keys).
    pub languages: Vec<Labeled>,
    pub lexemes: Vec<Labeled>,
    pub meanings: Vec<Labeled>,
    pub direction: Option<String>,
}

#[derive(Debug)]
pub struct ShiftPage {
    pub id: String,
    pub header: ShiftHeader,
    pub fragments: Vec<Fragment>,
    /// Fragments that lacked a required field.
    pub rejected: Vec<Error>,
}

impl ShiftPage {
    /// Realization tables found on the page, usable or not.
    pub fn examples(&self) -> usize {
        self.fragments.len() + self.rejected.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RowLabel {
    Type,
    Language,
    Lexeme,
    Meaning,
    Direction,
}

/// `Language`, `Language 1`, `Language2`, … ; anything else is ignored.
fn classify_label(label: &str) -> Option<RowLabel> {
    let numbered = |prefix: &str| {
        label
            .strip_prefix(prefix)
            .map(|rest| matches!(rest.trim(), "" | "1" | "2"))
            .unwrap_or(false)
    };
    if label == "Type" { return Some(RowLabel::Type); }
    if label == "Direction" { return Some(RowLabel::Direction); }
    if numbered("Language") { return Some(RowLabel::Language); }
    if numbered("Lexeme") { return Some(RowLabel::Lexeme); }
    if numbered("Meaning") { return Some(RowLabel::Meaning); }
    None
}

pub fn parse(id: &str, doc: &str) -> Result<ShiftPage> {
    let header = parse_header(id, doc)?;

    let mut fragments = Vec::new();
    let mut rejected = Vec::new();
    let tables = blocks_with_class(doc, "table", REALIZATION_TABLE_CLASS);
    for (i, table) in tables.into_iter().enumerate() {
        match parse_fragment(id, i + 1, table) {
            Ok(f) => fragments.push(f),
            Err(e) => rejected.push(e),
        }
    }

    Ok(ShiftPage { id: s!(id), header, fragments, rejected })
}

fn malformed(id: &str, reason: &str) -> Error {
    Error::MalformedPage { page: s!(id), reason: s!(reason) }
}

fn parse_header(id: &str, doc: &str) -> Result<ShiftHeader> {
    let block = blocks_with_class(doc, "div", HEADER_CLASS)
        .into_iter()
        .next()
        .ok_or_else(|| malformed(id, "shift header not found"))?;

    let items = blocks_with_class(block, "span", HEADER_ITEM_CLASS);
    let [source, direction, target] = items.as_slice() else {
        return Err(malformed(id, &format!("expected 3 header items, found {}", items.len())));
    };

    let count_txt = blocks_with_class(block, "span", REALIZATION_COUNT_CLASS)
        .first()
        .map(|b| cell_text(inner_after_open_tag(b)))
        .ok_or_else(|| malformed(id, "realization count not found"))?;
    let digits: String = count_txt.chars().take_while(char::is_ascii_digit).collect();
    let realizations = digits
        .parse::<u32>()
        .map_err(|_| malformed(id, &format!("unreadable realization count {count_txt:?}")))?;

    Ok(ShiftHeader {
        source: s!(inner_after_open_tag(source).trim()),
        direction: cell_text(inner_after_open_tag(direction)),
        target: s!(inner_after_open_tag(target).trim()),
        realizations,
    })
}

/// `[<span>status</span>] Realization N` → (status, N)
fn split_title(th_inner: &str) -> (String, String) {
    let (status, rest) = match tag_blocks(th_inner, "<span", "</span>").next() {
        Some(span) => {
            let after = th_inner.find(span).map(|at| &th_inner[at + span.len()..]).unwrap_or("");
            (cell_text(inner_after_open_tag(span)), cell_text(after))
        }
        None => (s!(), cell_text(th_inner)),
    };
    let title = match rest.find("Realization ") {
        Some(at) => s!(rest[at + "Realization ".len()..].trim()),
        None => rest,
    };
    (status, title)
}

fn parse_fragment(id: &str, index: usize, table: &str) -> Result<Fragment> {
    let mut frag = Fragment { index, ..Fragment::default() };

    if let Some(th) = tag_blocks(table, "<th", "</th>").next() {
        let (status, title) = split_title(inner_after_open_tag(th));
        frag.status = status;
        frag.title = title;
    }

    for tr in tag_blocks(table, "<tr", "</tr>") {
        let cells = row_cells(tr);
        if cells.len() < 2 { continue; }
        let label = cell_text(cells[0]);
        let Some(kind) = classify_label(&label) else { continue };
        let value = cells[1];

        match kind {
            RowLabel::Type => frag.kind = cell_text(value),
            RowLabel::Direction => {
                frag.direction = Some(cell_text(value)).filter(|d| !d.is_empty())
            }
            RowLabel::Language => frag.languages.push(Labeled { label, value: s!(value.trim()) }),
            RowLabel::Lexeme => frag.lexemes.push(Labeled { label, value: cell_text(value) }),
            RowLabel::Meaning => frag.meanings.push(Labeled { label, value: cell_text(value) }),
        }
    }

    if frag.meanings.is_empty() {
        return Err(Error::MalformedFragment {
            page: s!(id),
            fragment: index,
            reason: s!("no meaning rows"),
        });
    }
    Ok(frag)
}
