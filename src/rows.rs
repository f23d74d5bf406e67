// src/rows.rs
//! Shift row builder.
//!
//! A realization fragment names one or two languages, one or two lexemes and
//! two meanings. [`Shape`] is the closed set of combinations we know how to
//! pair into a source side and a target side; anything else is rejected with
//! [`Error::UnsupportedShape`] instead of guessed at.

use crate::core::sanitize::refine_gloss;
use crate::error::{Error, Result};
use crate::model::{Direction, ShiftRecord, ShiftType};
use crate::registry::LanguageRegistry;
use crate::specs::shift::Fragment;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// One language, one lexeme: the same word on both sides.
    OneLangOneLex,
    /// One language, lexeme[0] source, lexeme[1] target.
    OneLangTwoLex,
    /// language[i]/lexeme[i] per side.
    TwoLangTwoLex,
    /// language[0] source, language[1] target, one lexeme on both sides.
    TwoLangOneLex,
}

impl Shape {
    pub fn classify(languages: usize, lexemes: usize, meanings: usize) -> Option<Shape> {
        match (languages, lexemes, meanings) {
            (1, 1, 2) => Some(Shape::OneLangOneLex),
            (1, 2, 2) => Some(Shape::OneLangTwoLex),
            (2, 2, 2) => Some(Shape::TwoLangTwoLex),
            (2, 1, 2) => Some(Shape::TwoLangOneLex),
            _ => None,
        }
    }

    /// Indices into (languages, lexemes) for the source and the target side.
    fn sides(self) -> ((usize, usize), (usize, usize)) {
        match self {
            Shape::OneLangOneLex => ((0, 0), (0, 0)),
            Shape::OneLangTwoLex => ((0, 0), (0, 1)),
            Shape::TwoLangTwoLex => ((0, 0), (1, 1)),
            Shape::TwoLangOneLex => ((0, 0), (1, 0)),
        }
    }
}

/// The shift group a fragment belongs to, with its concepts already resolved.
#[derive(Clone, Copy, Debug)]
pub struct GroupContext<'a> {
    pub shift_id: &'a str,
    pub source: &'a str,
    pub source_id: u32,
    pub target: &'a str,
    pub target_id: u32,
}

/// Hands out sequence ids to the records it manages to build.
#[derive(Clone, Debug)]
pub struct RowBuilder {
    next_id: u32,
}

impl Default for RowBuilder {
    fn default() -> Self { Self { next_id: 1 } }
}

impl RowBuilder {
    pub fn next_id(&self) -> u32 { self.next_id }

    /// Build one record. Languages are registered only once the shape is
    /// accepted, and a rejected fragment does not consume a sequence id.
    pub fn build(
        &mut self,
        frag: &Fragment,
        ctx: &GroupContext<'_>,
        languages: &mut LanguageRegistry,
    ) -> Result<ShiftRecord> {
        let shape = Shape::classify(frag.languages.len(), frag.lexemes.len(), frag.meanings.len())
            .ok_or_else(|| Error::UnsupportedShape {
                page: s!(ctx.shift_id),
                fragment: frag.index,
                languages: frag.languages.len(),
                lexemes: frag.lexemes.len(),
                meanings: frag.meanings.len(),
            })?;

        let lang_ids: Vec<u32> = frag
            .languages
            .iter()
            .map(|l| languages.resolve_language(&l.value))
            .collect::<Result<_>>()?;

        let ((src_lang, src_lex), (tgt_lang, tgt_lex)) = shape.sides();
        let lang_name = |i: usize| refine_gloss(&frag.languages[i].value);

        let record = ShiftRecord {
            id: self.next_id,
            shift_id: s!(ctx.shift_id),
            kind: ShiftType::parse(&frag.kind),
            realization: frag.title.clone(),
            status: frag.status.clone(),
            direction: frag
                .direction
                .as_deref()
                .map(Direction::parse)
                .unwrap_or(Direction::Unknown),
            source_concept: s!(ctx.source),
            source_concept_id: ctx.source_id,
            target_concept: s!(ctx.target),
            target_concept_id: ctx.target_id,
            source_language: lang_name(src_lang),
            source_language_id: lang_ids[src_lang],
            target_language: lang_name(tgt_lang),
            target_language_id: lang_ids[tgt_lang],
            source_meaning: frag.meanings[0].value.clone(),
            target_meaning: frag.meanings[1].value.clone(),
            source_word: frag.lexemes[src_lex].value.clone(),
            target_word: frag.lexemes[tgt_lex].value.clone(),
        };
        self.next_id += 1;
        Ok(record)
    }
}
