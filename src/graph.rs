// src/graph.rs
//! Concept graph aggregation.
//!
//! Two adjacency maps, `concept -> concept -> EdgeEvidence`:
//! - `targets`: directed shifts (`→` as given, `←` with roles swapped);
//! - `links`: undirected shifts (`?`, `-`, `—`), stored in both directions.
//!
//! Only Polysemy and Derivation records contribute. Evidence lists are
//! append-only; distinct-family counts are computed when read.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;
use crate::model::{ConceptLink, Direction, EnrichedConcept, ShiftRecord, ShiftType};
use crate::registry::{ConceptRegistry, LanguageRegistry};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Evidence {
    pub count: u32,
    /// Citing shift-record ids.
    pub lexemes: Vec<u32>,
    /// Citing shift-group ids.
    pub shifts: Vec<String>,
    /// One family label per contribution, duplicates kept.
    pub families: Vec<String>,
}

impl Evidence {
    fn push(&mut self, record: &ShiftRecord, family: &str) {
        self.count += 1;
        self.lexemes.push(record.id);
        self.shifts.push(record.shift_id.clone());
        self.families.push(s!(family));
    }

    /// Distinct, sorted family labels, the empty (unknown) label included.
    pub fn family_set(&self) -> Vec<String> {
        self.families
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn distinct_families(&self) -> usize {
        self.families.iter().collect::<BTreeSet<_>>().len()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeEvidence {
    pub polysemy: Evidence,
    pub derivation: Evidence,
}

impl EdgeEvidence {
    pub fn get(&self, kind: &ShiftType) -> Option<&Evidence> {
        match kind {
            ShiftType::Polysemy => Some(&self.polysemy),
            ShiftType::Derivation => Some(&self.derivation),
            ShiftType::Other(_) => None,
        }
    }

    fn get_mut(&mut self, kind: &ShiftType) -> Option<&mut Evidence> {
        match kind {
            ShiftType::Polysemy => Some(&mut self.polysemy),
            ShiftType::Derivation => Some(&mut self.derivation),
            ShiftType::Other(_) => None,
        }
    }

    pub fn total(&self) -> u32 {
        self.polysemy.count + self.derivation.count
    }
}

pub type Adjacency = BTreeMap<u32, BTreeMap<u32, EdgeEvidence>>;

/// An undirected edge whose two stored directions disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymmetryViolation {
    pub a: u32,
    pub b: u32,
    pub kind: ShiftType,
    pub a_to_b: u32,
    pub b_to_a: u32,
}

/// `Source_Concept, Target_Concept, Derivation, Polysemy, Undirected`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairRow {
    pub source: String,
    pub target: String,
    pub derivation: u32,
    pub polysemy: u32,
    pub undirected: u32,
}

#[derive(Clone, Debug, Default)]
pub struct ConceptGraph {
    targets: Adjacency,
    links: Adjacency,
}

fn contribute(map: &mut Adjacency, from: u32, to: u32, record: &ShiftRecord, family: &str) {
    let edge = map.entry(from).or_default().entry(to).or_default();
    if let Some(ev) = edge.get_mut(&record.kind) {
        ev.push(record, family);
    }
}

impl ConceptGraph {
    pub fn build<'a, I>(records: I, languages: &LanguageRegistry) -> Result<Self>
    where
        I: IntoIterator<Item = &'a ShiftRecord>,
    {
        let mut graph = Self::default();
        for r in records {
            graph.add(r, languages)?;
        }
        Ok(graph)
    }

    /// Fold one record in. Returns how many edge contributions it made
    /// (0 for other types or unrecognized directions).
    pub fn add(&mut self, record: &ShiftRecord, languages: &LanguageRegistry) -> Result<usize> {
        if matches!(record.kind, ShiftType::Other(_)) {
            return Ok(0);
        }
        let (s, t) = (record.source_concept_id, record.target_concept_id);

        if let Direction::Other(d) = &record.direction {
            logd!("Graph: record {} has direction {:?}, no edge", record.id, d);
            return Ok(0);
        }
        let family = languages.require(record.source_language_id)?.family.clone();

        let made = match &record.direction {
            Direction::Forward => {
                contribute(&mut self.targets, s, t, record, &family);
                1
            }
            Direction::Backward => {
                contribute(&mut self.targets, t, s, record, &family);
                1
            }
            d if d.is_undirected() && s == t => {
                contribute(&mut self.links, s, t, record, &family);
                1
            }
            d if d.is_undirected() => {
                contribute(&mut self.links, s, t, record, &family);
                contribute(&mut self.links, t, s, record, &family);
                2
            }
            _ => 0,
        };
        Ok(made)
    }

    pub fn targets(&self) -> &Adjacency { &self.targets }
    pub fn links(&self) -> &Adjacency { &self.links }

    pub fn target_edge(&self, from: u32, to: u32) -> Option<&EdgeEvidence> {
        self.targets.get(&from)?.get(&to)
    }

    pub fn link_edge(&self, from: u32, to: u32) -> Option<&EdgeEvidence> {
        self.links.get(&from)?.get(&to)
    }

    /// Recount every undirected edge from both ends. Nothing is corrected.
    pub fn check_symmetry(&self) -> Vec<SymmetryViolation> {
        let mut out = Vec::new();
        for (&a, row) in &self.links {
            for (&b, edge) in row {
                let back = self.link_edge(b, a);
                // each pair is checked once from its lower end, unless that end is missing
                if a > b && back.is_some() { continue; }
                for kind in [ShiftType::Polysemy, ShiftType::Derivation] {
                    let fwd = edge.get(&kind).map(|e| e.count).unwrap_or(0);
                    let bwd = back.and_then(|e| e.get(&kind)).map(|e| e.count).unwrap_or(0);
                    if fwd != bwd {
                        logw!(
                            "Graph: undirected {} edge {}–{} counts {} vs {}",
                            kind, a, b, fwd, bwd
                        );
                        out.push(SymmetryViolation {
                            a,
                            b,
                            kind: kind.clone(),
                            a_to_b: fwd,
                            b_to_a: bwd,
                        });
                    }
                }
            }
        }
        out
    }

    fn summarize(
        row: Option<&BTreeMap<u32, EdgeEvidence>>,
        concepts: &ConceptRegistry,
    ) -> Result<Vec<ConceptLink>> {
        let Some(row) = row else { return Ok(Vec::new()) };
        let mut out = Vec::with_capacity(row.len());
        for (&other, edge) in row {
            let name = concepts.require(other)?.english.clone();
            out.push(ConceptLink {
                id: other,
                name,
                polysemy: edge.polysemy.count,
                derivation: edge.derivation.count,
                polysemy_by_family: edge.polysemy.distinct_families(),
                derivation_by_family: edge.derivation.distinct_families(),
                polysemy_lexemes: edge.polysemy.lexemes.clone(),
                derivation_lexemes: edge.derivation.lexemes.clone(),
                polysemy_shifts: edge.polysemy.shifts.clone(),
                derivation_shifts: edge.derivation.shifts.clone(),
                polysemy_families: edge.polysemy.family_set(),
                derivation_families: edge.derivation.family_set(),
            });
        }
        // strongest evidence first, then by id
        out.sort_by(|x, y| {
            (y.polysemy + y.derivation)
                .cmp(&(x.polysemy + x.derivation))
                .then(x.id.cmp(&y.id))
        });
        Ok(out)
    }

    /// `Target_Concepts` and `Linked_Concepts` of one concept.
    pub fn summaries(
        &self,
        concept: u32,
        concepts: &ConceptRegistry,
    ) -> Result<(Vec<ConceptLink>, Vec<ConceptLink>)> {
        Ok((
            Self::summarize(self.targets.get(&concept), concepts)?,
            Self::summarize(self.links.get(&concept), concepts)?,
        ))
    }

    /// Every concept row with its adjacency lists, in registry order.
    pub fn enrich(&self, concepts: &ConceptRegistry) -> Result<Vec<EnrichedConcept>> {
        concepts
            .rows()
            .iter()
            .map(|c| {
                let (target_concepts, linked_concepts) = self.summaries(c.number, concepts)?;
                Ok(EnrichedConcept { concept: c.clone(), target_concepts, linked_concepts })
            })
            .collect()
    }

    /// One row per ordered concept pair with any evidence.
    pub fn pair_rows(&self, concepts: &ConceptRegistry) -> Result<Vec<PairRow>> {
        let mut pairs: BTreeMap<(u32, u32), PairRow> = BTreeMap::new();
        let name = |id: u32| concepts.require(id).map(|c| c.english.clone());

        for (&a, row) in &self.targets {
            for (&b, edge) in row {
                let p = pairs.entry((a, b)).or_insert(PairRow {
                    source: name(a)?,
                    target: name(b)?,
                    derivation: 0,
                    polysemy: 0,
                    undirected: 0,
                });
                p.derivation = edge.derivation.count;
                p.polysemy = edge.polysemy.count;
            }
        }
        for (&a, row) in &self.links {
            for (&b, edge) in row {
                if !pairs.contains_key(&(a, b)) {
                    pairs.insert((a, b), PairRow {
                        source: name(a)?,
                        target: name(b)?,
                        derivation: 0,
                        polysemy: 0,
                        undirected: 0,
                    });
                }
                if let Some(p) = pairs.get_mut(&(a, b)) {
                    p.undirected = edge.total();
                }
            }
        }
        Ok(pairs.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::overrides::GlottocodeOverrides;
    use crate::specs::languages::LanguageRow;

    fn languages() -> LanguageRegistry {
        let row = |id: u32, name: &str, family: &str| LanguageRow {
            id,
            name: s!(name),
            glottocode: s!(),
            family: s!(family),
            subgroup: s!(),
            words: 0,
        };
        LanguageRegistry::load(
            vec![
                row(1, "Russian", "Indo-European"),
                row(2, "English", "Indo-European"),
                row(3, "Finnish", "Uralic"),
            ],
            &GlottocodeOverrides::default(),
        )
    }

    fn record(id: u32, kind: &str, dir: &str, src: u32, tgt: u32, lang: u32) -> ShiftRecord {
        ShiftRecord {
            id,
            shift_id: format!("shift{id:04}"),
            kind: ShiftType::parse(kind),
            realization: s!("1"),
            status: s!(),
            direction: Direction::parse(dir),
            source_concept: s!(),
            source_concept_id: src,
            target_concept: s!(),
            target_concept_id: tgt,
            source_language: s!(),
            source_language_id: lang,
            target_language: s!(),
            target_language_id: lang,
            source_meaning: s!(),
            target_meaning: s!(),
            source_word: s!(),
            target_word: s!(),
        }
    }

    #[test]
    fn backward_swaps_roles() {
        let langs = languages();
        let g = ConceptGraph::build(&[record(1, "Polysemy", "←", 10, 20, 1)], &langs).unwrap();
        let e = g.target_edge(20, 10).unwrap();
        assert_eq!(e.polysemy.count, 1);
        assert_eq!(e.polysemy.lexemes, vec![1]);
        assert!(g.target_edge(10, 20).is_none());
        assert!(g.links().is_empty());
    }

    #[test]
    fn forward_is_one_way() {
        let langs = languages();
        let g = ConceptGraph::build(&[record(1, "Derivation", "→", 10, 20, 3)], &langs).unwrap();
        let e = g.target_edge(10, 20).unwrap();
        assert_eq!(e.derivation.count, 1);
        assert_eq!(e.derivation.families, vec![s!("Uralic")]);
        assert!(g.target_edge(20, 10).is_none());
    }

    #[test]
    fn undirected_is_symmetric() {
        let langs = languages();
        let recs = [
            record(1, "Derivation", "?", 10, 20, 1),
            record(2, "Derivation", "-", 20, 10, 3),
            record(3, "Polysemy", "—", 10, 20, 2),
        ];
        let g = ConceptGraph::build(&recs, &langs).unwrap();
        let ab = g.link_edge(10, 20).unwrap();
        let ba = g.link_edge(20, 10).unwrap();
        assert_eq!(ab.derivation.count, 2);
        assert_eq!(ab.derivation.count, ba.derivation.count);
        assert_eq!(ab.polysemy.count, ba.polysemy.count);
        assert_eq!(ab.derivation.shifts, ba.derivation.shifts);
        assert!(g.targets().is_empty());
        assert!(g.check_symmetry().is_empty());
    }

    #[test]
    fn unknown_direction_and_other_types_contribute_nothing() {
        let langs = languages();
        let mut g = ConceptGraph::default();
        assert_eq!(g.add(&record(1, "Polysemy", "*", 10, 20, 1), &langs).unwrap(), 0);
        assert_eq!(g.add(&record(2, "Cognates", "→", 10, 20, 1), &langs).unwrap(), 0);
        assert!(g.targets().is_empty());
        assert!(g.links().is_empty());
    }

    #[test]
    fn self_loop_counts_once() {
        let langs = languages();
        let g = ConceptGraph::build(&[record(1, "Polysemy", "?", 10, 10, 1)], &langs).unwrap();
        assert_eq!(g.link_edge(10, 10).unwrap().polysemy.count, 1);
    }

    #[test]
    fn family_count_is_idempotent_and_ignores_duplicates() {
        let mut ev = Evidence::default();
        let r = record(1, "Polysemy", "→", 1, 2, 1);
        ev.push(&r, "Indo-European");
        ev.push(&r, "Uralic");
        let first = ev.distinct_families();
        assert_eq!(first, 2);
        assert_eq!(first, ev.distinct_families());
        ev.push(&r, "Uralic");
        assert_eq!(ev.distinct_families(), first);
        assert_eq!(ev.families.len(), 3);
    }

    #[test]
    fn unknown_family_counts_as_one_label() {
        let mut langs = languages();
        let hittite = langs.resolve_language("Hittite").unwrap();
        let records = [record(1, "Polysemy", "→", 1, 2, hittite)];
        let g = ConceptGraph::build(&records, &langs).unwrap();
        let e = &g.target_edge(1, 2).unwrap().polysemy;
        assert_eq!(e.families, vec![s!()]);
        let set: BTreeSet<&String> = e.families.iter().collect();
        assert_eq!(e.distinct_families(), set.len());
        assert_eq!(e.distinct_families(), 1);
        assert_eq!(e.family_set(), vec![s!()]);
    }

    #[test]
    fn missing_language_is_fatal() {
        let langs = languages();
        let records = [record(1, "Polysemy", "→", 1, 2, 99)];
        let err = ConceptGraph::build(&records, &langs).unwrap_err();
        assert!(matches!(err, crate::error::Error::UnresolvedLanguage(99)));
    }

    #[test]
    fn symmetry_check_reports_one_sided_edges() {
        let mut g = ConceptGraph::default();
        contribute(&mut g.links, 6, 5, &record(1, "Polysemy", "?", 6, 5, 1), "Uralic");
        let v = g.check_symmetry();
        let expected = SymmetryViolation {
            a: 6,
            b: 5,
            kind: ShiftType::Polysemy,
            a_to_b: 1,
            b_to_a: 0,
        };
        assert_eq!(v, vec![expected]);
    }

    #[test]
    fn summaries_sort_by_evidence() {
        use crate::specs::concepts::ConceptRow;
        let row = |g: &str| ConceptRow {
            gloss: s!(g),
            definition: s!(),
            alias: s!(),
            domain: s!(),
        };
        let concepts =
            ConceptRegistry::load(vec![row("eye"), row("see"), row("look"), row("know")]);
        let langs = languages();
        let recs = [
            record(1, "Polysemy", "→", 1, 3, 1),
            record(2, "Polysemy", "→", 1, 2, 1),
            record(3, "Derivation", "→", 1, 2, 3),
            record(4, "Polysemy", "?", 1, 4, 2),
        ];
        let g = ConceptGraph::build(&recs, &langs).unwrap();
        let (targets, linked) = g.summaries(1, &concepts).unwrap();
        assert_eq!(targets.iter().map(|l| l.id).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(targets[0].name, "see");
        assert_eq!(targets[0].polysemy, 1);
        assert_eq!(targets[0].derivation, 1);
        assert_eq!(targets[0].derivation_families, vec![s!("Uralic")]);
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].name, "know");

        let (_, linked_back) = g.summaries(4, &concepts).unwrap();
        assert_eq!(linked_back[0].id, 1);

        let pairs = g.pair_rows(&concepts).unwrap();
        let eye_see = pairs.iter().find(|p| p.source == "eye" && p.target == "see").unwrap();
        assert_eq!((eye_see.polysemy, eye_see.derivation, eye_see.undirected), (1, 1, 0));
        let know_eye = pairs.iter().find(|p| p.source == "know" && p.target == "eye").unwrap();
        assert_eq!(know_eye.undirected, 1);
    }
}
