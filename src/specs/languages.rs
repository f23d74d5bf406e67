// src/specs/languages.rs
//! Spec for the bulk language listing page.
//!
//! Each data row is a `<tr>` of `<td>` cells:
//! `ID, Name, Glottocode, Family, [SubGroup,] Words`.
//! Older captures have no sub-group column (five cells).

use crate::core::html::{row_cells, tag_blocks};
use crate::core::sanitize::cell_text;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageRow {
    pub id: u32,
    /// Trimmed, raw; the registry key.
    pub name: String,
    pub glottocode: String,
    pub family: String,
    pub subgroup: String,
    pub words: u32,
}

pub fn parse(doc: &str) -> Vec<LanguageRow> {
    let mut out = Vec::new();
    for tr in tag_blocks(doc, "<tr", "</tr>") {
        let cells = row_cells(tr);
        if cells.len() < 5 { continue; }

        let id_txt = cell_text(cells[0]);
        let Ok(id) = id_txt.parse::<u32>() else {
            logw!("Languages: skipping row with non-numeric id {:?}", id_txt);
            continue;
        };

        let (subgroup, words) = if cells.len() >= 6 {
            (cell_text(cells[4]), cell_text(cells[5]))
        } else {
            (s!(), cell_text(cells[4]))
        };

        out.push(LanguageRow {
            id,
            name: s!(cells[1].trim()),
            glottocode: cell_text(cells[2]),
            family: cell_text(cells[3]),
            subgroup,
            words: words.replace([',', ' '], "").parse().unwrap_or(0),
        });
    }
    logd!("Languages: parsed {} rows", out.len());
    out
}
