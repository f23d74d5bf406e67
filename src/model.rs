// src/model.rs
//! Typed rows behind the output tables.

use std::fmt;

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Language {
    pub id: u32,
    pub name: String,
    /// Empty when no valid code is known.
    pub glottocode: String,
    pub family: String,
    pub subgroup: String,
    pub word_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Concept {
    pub number: u32,
    pub english: String,
    pub gloss_in_source: String,
    pub definition: String,
    pub alias: String,
    pub domain: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShiftType {
    Polysemy,
    Derivation,
    Other(String),
}

impl ShiftType {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "Polysemy" => ShiftType::Polysemy,
            "Derivation" => ShiftType::Derivation,
            other => ShiftType::Other(s!(other)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ShiftType::Polysemy => "Polysemy",
            ShiftType::Derivation => "Derivation",
            ShiftType::Other(s) => s,
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `→`
    Forward,
    /// `←`
    Backward,
    /// `?`
    Unknown,
    /// `-`
    Hyphen,
    /// `—`
    Dash,
    Other(String),
}

impl Direction {
    /// Accepts the literal arrows as well as their HTML entity spellings.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "→" | "&rarr;" => Direction::Forward,
            "←" | "&larr;" => Direction::Backward,
            "?" | "" => Direction::Unknown,
            "-" => Direction::Hyphen,
            "—" | "&mdash;" => Direction::Dash,
            other => Direction::Other(s!(other)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Direction::Forward => "→",
            Direction::Backward => "←",
            Direction::Unknown => "?",
            Direction::Hyphen => "-",
            Direction::Dash => "—",
            Direction::Other(s) => s,
        }
    }

    pub fn is_undirected(&self) -> bool {
        matches!(self, Direction::Unknown | Direction::Hyphen | Direction::Dash)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page-level aggregate of one source/target concept pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShiftGroup {
    pub id: String,
    pub source: String,
    pub source_number: u32,
    /// Header label, kept verbatim.
    pub direction: String,
    pub target: String,
    pub target_number: u32,
    /// Count stated by the page header.
    pub realizations: u32,
    /// Realization fragments actually found on the page.
    pub examples: u32,
}

/// One realization of a shift, the 18-column lexeme table row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShiftRecord {
    pub id: u32,
    pub shift_id: String,
    pub kind: ShiftType,
    pub realization: String,
    pub status: String,
    pub direction: Direction,
    pub source_concept: String,
    pub source_concept_id: u32,
    pub target_concept: String,
    pub target_concept_id: u32,
    pub source_language: String,
    pub source_language_id: u32,
    pub target_language: String,
    pub target_language_id: u32,
    pub source_meaning: String,
    pub target_meaning: String,
    pub source_word: String,
    pub target_word: String,
}

/// One entry of a concept's `Target_Concepts` / `Linked_Concepts` list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConceptLink {
    #[serde(rename = "ID")]
    pub id: u32,
    #[serde(rename = "NAME")]
    pub name: String,
    #[serde(rename = "Polysemy")]
    pub polysemy: u32,
    #[serde(rename = "Derivation")]
    pub derivation: u32,
    #[serde(rename = "PolysemyByFamily")]
    pub polysemy_by_family: usize,
    #[serde(rename = "DerivationByFamily")]
    pub derivation_by_family: usize,
    #[serde(rename = "Polysemy_Lexemes")]
    pub polysemy_lexemes: Vec<u32>,
    #[serde(rename = "Derivation_Lexemes")]
    pub derivation_lexemes: Vec<u32>,
    #[serde(rename = "Polysemy_Shifts")]
    pub polysemy_shifts: Vec<String>,
    #[serde(rename = "Derivation_Shifts")]
    pub derivation_shifts: Vec<String>,
    #[serde(rename = "Polysemy_Families")]
    pub polysemy_families: Vec<String>,
    #[serde(rename = "Derivation_Families")]
    pub derivation_families: Vec<String>,
}

/// Concept row plus its computed adjacency lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnrichedConcept {
    pub concept: Concept,
    pub target_concepts: Vec<ConceptLink>,
    pub linked_concepts: Vec<ConceptLink>,
}
