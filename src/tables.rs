// src/tables.rs
//! Shapes typed rows into header + string rows, ready for `csv::write_row`.

use crate::config::consts::*;
use crate::error::Result;
use crate::graph::PairRow;
use crate::model::{EnrichedConcept, ShiftGroup, ShiftRecord};
use crate::registry::{ConceptRegistry, LanguageRegistry};

pub const LANGUAGE_HEADERS: &[&str] = &["ID", "Name", "Glottocode", "Family", "SubGroup", "Words"];

pub const CONCEPT_HEADERS: &[&str] =
    &["NUMBER", "ENGLISH", "GLOSS_IN_SOURCE", "DEFINITION", "ALIAS", "DOMAIN"];

pub const SHIFT_HEADERS: &[&str] = &[
    "ID", "Source", "Source_Number", "Direction", "Target", "Target_Number",
    "Realizations", "Examples",
];

pub const LEXEME_HEADERS: &[&str] = &[
    "ID", "Shift_ID", "Type", "Realization", "Status", "Direction",
    "Source_Concept", "Source_Concept_ID", "Target_Concept", "Target_Concept_ID",
    "Source_Language", "Source_Language_ID", "Target_Language", "Target_Language_ID",
    "Source_Meaning", "Target_Meaning", "Source_Word", "Target_Word",
];

pub const PARAMETER_HEADERS: &[&str] = &[
    "NUMBER", "ENGLISH", "GLOSS_IN_SOURCE", "DEFINITION", "ALIAS", "DOMAIN",
    "Target_Concepts", "Linked_Concepts",
];

pub const PAIR_HEADERS: &[&str] =
    &["Source_Concept", "Target_Concept", "Derivation", "Polysemy", "Undirected"];

/// One output table. `name` is the file stem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub headers: &'static [&'static str],
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Cell by header name, for tests and spot checks.
    pub fn cell(&self, row: usize, header: &str) -> Option<&str> {
        let col = self.headers.iter().position(|h| *h == header)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}

pub fn languages(reg: &LanguageRegistry) -> Table {
    let rows = reg
        .rows()
        .iter()
        .map(|l| vec![
            l.id.to_string(),
            l.name.clone(),
            l.glottocode.clone(),
            l.family.clone(),
            l.subgroup.clone(),
            l.word_count.to_string(),
        ])
        .collect();
    Table { name: LANGUAGES_FILE, headers: LANGUAGE_HEADERS, rows }
}

pub fn concepts(reg: &ConceptRegistry) -> Table {
    let rows = reg
        .rows()
        .iter()
        .map(|c| vec![
            c.number.to_string(),
            c.english.clone(),
            c.gloss_in_source.clone(),
            c.definition.clone(),
            c.alias.clone(),
            c.domain.clone(),
        ])
        .collect();
    Table { name: CONCEPTS_FILE, headers: CONCEPT_HEADERS, rows }
}

pub fn shift_groups(groups: &[ShiftGroup]) -> Table {
    let rows = groups
        .iter()
        .map(|g| vec![
            g.id.clone(),
            g.source.clone(),
            g.source_number.to_string(),
            g.direction.clone(),
            g.target.clone(),
            g.target_number.to_string(),
            g.realizations.to_string(),
            g.examples.to_string(),
        ])
        .collect();
    Table { name: SHIFTS_FILE, headers: SHIFT_HEADERS, rows }
}

pub fn lexemes(records: &[ShiftRecord]) -> Table {
    let rows = records
        .iter()
        .map(|r| vec![
            r.id.to_string(),
            r.shift_id.clone(),
            r.kind.to_string(),
            r.realization.clone(),
            r.status.clone(),
            r.direction.to_string(),
            r.source_concept.clone(),
            r.source_concept_id.to_string(),
            r.target_concept.clone(),
            r.target_concept_id.to_string(),
            r.source_language.clone(),
            r.source_language_id.to_string(),
            r.target_language.clone(),
            r.target_language_id.to_string(),
            r.source_meaning.clone(),
            r.target_meaning.clone(),
            r.source_word.clone(),
            r.target_word.clone(),
        ])
        .collect();
    Table { name: LEXEMES_FILE, headers: LEXEME_HEADERS, rows }
}

/// Concept rows with `Target_Concepts` / `Linked_Concepts` as JSON arrays.
pub fn parameters(enriched: &[EnrichedConcept]) -> Result<Table> {
    let mut rows = Vec::with_capacity(enriched.len());
    for e in enriched {
        let c = &e.concept;
        rows.push(vec![
            c.number.to_string(),
            c.english.clone(),
            c.gloss_in_source.clone(),
            c.definition.clone(),
            c.alias.clone(),
            c.domain.clone(),
            serde_json::to_string(&e.target_concepts)?,
            serde_json::to_string(&e.linked_concepts)?,
        ]);
    }
    Ok(Table { name: PARAMETERS_FILE, headers: PARAMETER_HEADERS, rows })
}

pub fn pairs(pairs: &[PairRow]) -> Table {
    let rows = pairs
        .iter()
        .map(|p| vec![
            p.source.clone(),
            p.target.clone(),
            p.derivation.to_string(),
            p.polysemy.to_string(),
            p.undirected.to_string(),
        ])
        .collect();
    Table { name: PAIRS_FILE, headers: PAIR_HEADERS, rows }
}
