// src/specs/concepts.rs
//! Spec for the per-letter concept listing pages.
//!
//! Data rows: `<td>` cells `gloss, definition, alias, domain`. The gloss is
//! kept raw (trimmed): it is the key shift headers are matched against.

use crate::core::html::{row_cells, tag_blocks};
use crate::core::sanitize::{cell_text, single_line};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConceptRow {
    pub gloss: String,
    pub definition: String,
    pub alias: String,
    pub domain: String,
}

pub fn parse(doc: &str) -> Vec<ConceptRow> {
    tag_blocks(doc, "<tr", "</tr>")
        .filter_map(|tr| {
            let cells = row_cells(tr);
            if cells.len() < 4 { return None; }
            let gloss = s!(cells[0].trim());
            if gloss.is_empty() { return None; }
            Some(ConceptRow {
                gloss,
                definition: single_line(&cell_text(cells[1])),
                alias: cell_text(cells[2]),
                domain: cell_text(cells[3]),
            })
        })
        .collect()
}
