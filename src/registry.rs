// src/registry.rs
//! Identity registry for languages and concepts.
//!
//! Both tables are discovered incrementally: a bulk page gives the initial
//! rows, shift pages then mention names the bulk pages never listed. Every
//! raw key maps to exactly one id for the life of the run; new ids come from a
//! running counter that starts one past the largest id loaded.
//!
//! Keys are compared verbatim. Callers pass trimmed text.

use std::collections::{HashMap, HashSet};

use crate::config::overrides::{Correction, GlottocodeOverrides};
use crate::core::sanitize::refine_gloss;
use crate::error::{Error, Result};
use crate::model::{Concept, Language};
use crate::specs::concepts::ConceptRow;
use crate::specs::languages::LanguageRow;

/// Raw key → id, plus the next id to hand out.
#[derive(Clone, Debug)]
pub struct IdRegistry {
    ids: HashMap<String, u32>,
    used: HashSet<u32>,
    next_id: u32,
}

impl Default for IdRegistry {
    fn default() -> Self {
        Self { ids: HashMap::new(), used: HashSet::new(), next_id: 1 }
    }
}

/// Outcome of [`IdRegistry::bind`]. Only `Bound` changes the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bind {
    Bound,
    KeyTaken(u32),
    IdTaken,
    /// No id would be left after this one.
    OutOfRange,
}

impl IdRegistry {
    pub fn get(&self, key: &str) -> Option<u32> {
        self.ids.get(key).copied()
    }

    /// Existing id, or a fresh one. The flag is `true` when the key was new.
    pub fn resolve(&mut self, key: &str) -> Result<(u32, bool)> {
        if let Some(&id) = self.ids.get(key) {
            return Ok((id, false));
        }
        let id = self.next_id;
        let next = id
            .checked_add(1)
            .ok_or_else(|| Error::Input(format!("id space exhausted at {:?}", key)))?;
        self.ids.insert(s!(key), id);
        self.used.insert(id);
        self.next_id = next;
        Ok((id, true))
    }

    /// Bind a key to an id chosen by the source data.
    pub fn bind(&mut self, key: &str, id: u32) -> Bind {
        if let Some(&bound) = self.ids.get(key) {
            return Bind::KeyTaken(bound);
        }
        if self.used.contains(&id) {
            return Bind::IdTaken;
        }
        let Some(next) = id.checked_add(1) else {
            return Bind::OutOfRange;
        };
        self.ids.insert(s!(key), id);
        self.used.insert(id);
        self.next_id = self.next_id.max(next);
        Bind::Bound
    }

    pub fn next_id(&self) -> u32 { self.next_id }
    pub fn len(&self) -> usize { self.ids.len() }
    pub fn is_empty(&self) -> bool { self.ids.is_empty() }
}

/* ---------------- Languages ---------------- */

#[derive(Clone, Debug, Default)]
pub struct LanguageRegistry {
    keys: IdRegistry,
    rows: Vec<Language>,
    index: HashMap<u32, usize>,
    /// Glottocodes left unlisted under the `review` policy: (language id, code).
    review: Vec<(u32, String)>,
}

impl LanguageRegistry {
    /// Bulk load from the language page, correcting glottocodes on the way.
    pub fn load(rows: Vec<LanguageRow>, overrides: &GlottocodeOverrides) -> Self {
        let mut reg = Self::default();
        for row in rows {
            match reg.keys.bind(&row.name, row.id) {
                Bind::Bound => {}
                Bind::KeyTaken(id) => {
                    logw!(
                        "Languages: duplicate name {:?} (id {}) keeps id {}",
                        row.name, row.id, id
                    );
                    continue;
                }
                Bind::IdTaken => {
                    logw!("Languages: id {} already taken, {:?} ignored", row.id, row.name);
                    continue;
                }
                Bind::OutOfRange => {
                    logw!("Languages: id {} out of range, {:?} ignored", row.id, row.name);
                    continue;
                }
            }
            let glottocode = match overrides.correct(&row.glottocode) {
                Correction::Valid(v) => v,
                Correction::Corrected { from, to } => {
                    logd!("Languages: glottocode {:?} → {:?} for {}", from, to, row.name);
                    to
                }
                Correction::Unlisted { from, kept, review } => {
                    if review {
                        logw!(
                            "Languages: unlisted glottocode {:?} for {} needs review",
                            from, row.name
                        );
                        reg.review.push((row.id, from));
                    }
                    kept
                }
            };
            reg.push(Language {
                id: row.id,
                name: refine_gloss(&row.name),
                glottocode,
                family: row.family,
                subgroup: row.subgroup,
                word_count: row.words,
            });
        }
        logf!("Languages: loaded {} (next id {})", reg.rows.len(), reg.keys.next_id());
        reg
    }

    fn push(&mut self, lang: Language) {
        self.index.insert(lang.id, self.rows.len());
        self.rows.push(lang);
    }

    /// Id for a language name, creating an empty entry on first sight.
    pub fn resolve_language(&mut self, raw_name: &str) -> Result<u32> {
        let (id, created) = self.keys.resolve(raw_name)?;
        if created {
            logd!("Languages: new language {:?} → {}", raw_name, id);
            self.push(Language {
                id,
                name: refine_gloss(raw_name),
                glottocode: s!(),
                family: s!(),
                subgroup: s!(),
                word_count: 0,
            });
        }
        Ok(id)
    }

    pub fn language(&self, id: u32) -> Option<&Language> {
        self.index.get(&id).map(|&i| &self.rows[i])
    }

    /// Lookup for ids that must exist; absence is a broken invariant.
    pub fn require(&self, id: u32) -> Result<&Language> {
        self.language(id).ok_or(Error::UnresolvedLanguage(id))
    }

    pub fn language_mut(&mut self, id: u32) -> Option<&mut Language> {
        let i = *self.index.get(&id)?;
        self.rows.get_mut(i)
    }

    /// Rows in insertion order: bulk rows first, then lazily created ones.
    pub fn rows(&self) -> &[Language] { &self.rows }
    pub fn review(&self) -> &[(u32, String)] { &self.review }
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

/* ---------------- Concepts ---------------- */

#[derive(Clone, Debug, Default)]
pub struct ConceptRegistry {
    keys: IdRegistry,
    rows: Vec<Concept>,
    index: HashMap<u32, usize>,
}

impl ConceptRegistry {
    /// Bulk load from the concept pages, numbering from 1 in scan order.
    /// A gloss listed twice keeps its first number.
    pub fn load(rows: Vec<ConceptRow>) -> Self {
        let mut reg = Self::default();
        for row in rows {
            let (number, created) = match reg.keys.resolve(&row.gloss) {
                Ok(r) => r,
                Err(e) => {
                    logw!("Concepts: {}; rest of the listing ignored", e);
                    break;
                }
            };
            if !created {
                logw!("Concepts: duplicate gloss {:?} keeps number {}", row.gloss, number);
                continue;
            }
            reg.push(Concept {
                number,
                english: refine_gloss(&row.gloss),
                gloss_in_source: row.gloss,
                definition: row.definition,
                alias: row.alias,
                domain: row.domain,
            });
        }
        logf!("Concepts: loaded {}", reg.rows.len());
        reg
    }

    fn push(&mut self, concept: Concept) {
        self.index.insert(concept.number, self.rows.len());
        self.rows.push(concept);
    }

    /// Number for a raw gloss, appending an empty entry on first sight.
    pub fn resolve_concept(&mut self, raw_gloss: &str) -> Result<u32> {
        let (number, created) = self.keys.resolve(raw_gloss)?;
        if created {
            logd!("Concepts: new concept {:?} → {}", raw_gloss, number);
            self.push(Concept {
                number,
                english: refine_gloss(raw_gloss),
                gloss_in_source: s!(raw_gloss),
                definition: s!(),
                alias: s!(),
                domain: s!(),
            });
        }
        Ok(number)
    }

    /// Number already bound to a raw gloss, without creating one.
    pub fn number(&self, raw_gloss: &str) -> Option<u32> { self.keys.get(raw_gloss) }

    pub fn concept(&self, number: u32) -> Option<&Concept> {
        self.index.get(&number).map(|&i| &self.rows[i])
    }

    pub fn require(&self, number: u32) -> Result<&Concept> {
        self.concept(number).ok_or(Error::UnresolvedConcept(number))
    }

    pub fn rows(&self) -> &[Concept] { &self.rows }
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}
