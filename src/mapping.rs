// src/mapping.rs
//! Concept list → reference concept set mapping.
//!
//! The lookup itself is a black box behind [`ConceptLookup`]; the crate ships
//! [`TableLookup`], an exact-match lookup read from a delimited file with
//! `ENGLISH, CONCEPTICON_ID, CONCEPTICON_GLOSS` columns.

use std::collections::HashMap;
use std::path::Path;

use crate::config::consts::MAPPED_FILE;
use crate::csv::parse_rows;
use crate::error::{Error, Result};
use crate::model::Concept;
use crate::tables::Table;

pub const MAPPED_HEADERS: &[&str] = &[
    "NUMBER", "ENGLISH", "CONCEPTICON_ID", "CONCEPTICON_GLOSS", "CERTAINTY",
    "GLOSS_IN_SOURCE", "DEFINITION", "ALIAS", "DOMAIN",
];

/// Certainty reported for an exact gloss match.
pub const EXACT_CERTAINTY: &str = "100";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mapped {
    pub id: String,
    pub gloss: String,
    pub certainty: String,
}

pub trait ConceptLookup {
    fn lookup(&self, english: &str) -> Option<Mapped>;
}

#[derive(Clone, Debug, Default)]
pub struct TableLookup {
    entries: HashMap<String, (String, String)>,
}

impl TableLookup {
    /// Rows as parsed by `csv::parse_rows`, header first.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self> {
        let mut it = rows.into_iter();
        let header = it
            .next()
            .ok_or_else(|| Error::Input(s!("mapping table is empty")))?;
        let col = |name: &str| {
            header
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| Error::Input(format!("mapping table has no {name} column")))
        };
        let (english, id, gloss) =
            (col("ENGLISH")?, col("CONCEPTICON_ID")?, col("CONCEPTICON_GLOSS")?);

        let mut entries = HashMap::new();
        for row in it {
            let cell = |i: usize| row.get(i).map(|s| s.trim()).unwrap_or_default();
            if cell(english).is_empty() { continue; }
            entries
                .entry(s!(cell(english)))
                .or_insert_with(|| (s!(cell(id)), s!(cell(gloss))));
        }
        Ok(Self { entries })
    }

    /// `.csv` is read comma-separated, anything else tab-separated.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let sep = match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => ',',
            _ => '\t',
        };
        let lookup = Self::from_rows(parse_rows(&text, sep))?;
        logf!("Mapping: {} entries from {}", lookup.len(), path.display());
        Ok(lookup)
    }

    pub fn insert(&mut self, english: &str, id: &str, gloss: &str) {
        self.entries.insert(s!(english), (s!(id), s!(gloss)));
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl ConceptLookup for TableLookup {
    fn lookup(&self, english: &str) -> Option<Mapped> {
        self.entries.get(english).map(|(id, gloss)| Mapped {
            id: id.clone(),
            gloss: gloss.clone(),
            certainty: s!(EXACT_CERTAINTY),
        })
    }
}

/// The concept table with mapping columns; misses leave them empty.
pub fn map_concepts(concepts: &[Concept], lookup: &dyn ConceptLookup) -> Table {
    let mut hits = 0usize;
    let rows = concepts
        .iter()
        .map(|c| {
            let m = lookup.lookup(&c.english);
            if m.is_some() { hits += 1; }
            let (id, gloss, certainty) = m
                .map(|m| (m.id, m.gloss, m.certainty))
                .unwrap_or_default();
            vec![
                c.number.to_string(),
                c.english.clone(),
                id,
                gloss,
                certainty,
                c.gloss_in_source.clone(),
                c.definition.clone(),
                c.alias.clone(),
                c.domain.clone(),
            ]
        })
        .collect();
    logf!("Mapping: {}/{} concepts mapped", hits, concepts.len());
    Table { name: MAPPED_FILE, headers: MAPPED_HEADERS, rows }
}
