// src/pipeline.rs
//! One pass from captured pages to tables.
//!
//! Order matters: the language and concept listings are loaded first so bulk
//! ids are fixed before any shift page can create entries lazily. Shift pages
//! are then read in file-name order, records built, and finally the concept
//! graph is aggregated over everything that was emitted.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use crate::config::consts::{PAGE_EXT, SHIFT_PAGE_PREFIX};
use crate::config::options::PipelineOptions;
use crate::config::overrides::GlottocodeOverrides;
use crate::error::{Error, Result};
use crate::file::{list_pages, page_id, read_page, write_table};
use crate::graph::{ConceptGraph, PairRow, SymmetryViolation};
use crate::mapping::{map_concepts, ConceptLookup, TableLookup};
use crate::model::{EnrichedConcept, ShiftGroup, ShiftRecord};
use crate::progress::{NullProgress, Progress};
use crate::registry::{ConceptRegistry, LanguageRegistry};
use crate::rows::{GroupContext, RowBuilder};
use crate::specs::{concepts, languages, shift};
use crate::tables::{self, Table};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SkipKind {
    Page,
    Fragment,
    Shape,
}

impl fmt::Display for SkipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipKind::Page => "page",
            SkipKind::Fragment => "fragment",
            SkipKind::Shape => "unsupported shape",
        })
    }
}

/// Something the run dropped on purpose, kept for the end-of-run report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkipReport {
    pub kind: SkipKind,
    pub page: String,
    pub detail: String,
}

impl SkipReport {
    /// `None` for errors that are not skips.
    pub fn from_error(err: &Error) -> Option<Self> {
        let (kind, page) = match err {
            Error::MalformedPage { page, .. } => (SkipKind::Page, page),
            Error::MalformedFragment { page, .. } => (SkipKind::Fragment, page),
            Error::UnsupportedShape { page, .. } => (SkipKind::Shape, page),
            _ => return None,
        };
        Some(Self { kind, page: page.clone(), detail: err.to_string() })
    }
}

#[derive(Debug, Default)]
pub struct Pipeline {
    languages: LanguageRegistry,
    concepts: ConceptRegistry,
    builder: RowBuilder,
    groups: Vec<ShiftGroup>,
    records: Vec<ShiftRecord>,
    skips: Vec<SkipReport>,
}

impl Pipeline {
    pub fn new() -> Self { Self::default() }

    pub fn load_languages(&mut self, doc: &str, overrides: &GlottocodeOverrides) {
        self.languages = LanguageRegistry::load(languages::parse(doc), overrides);
    }

    /// All concept listing pages, in the order given.
    pub fn load_concepts<I, S>(&mut self, docs: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = docs
            .into_iter()
            .flat_map(|d| concepts::parse(d.as_ref()))
            .collect();
        self.concepts = ConceptRegistry::load(rows);
    }

    fn skip(&mut self, err: Error) -> Result<()> {
        if !err.is_skippable() {
            return Err(err);
        }
        if let Some(report) = SkipReport::from_error(&err) {
            logw!("Skipped {}: {}", report.kind, report.detail);
            self.skips.push(report);
        }
        Ok(())
    }

    /// Read one shift page. Returns how many records it produced; a
    /// malformed page produces none and is reported, not raised.
    pub fn add_shift_page(&mut self, id: &str, doc: &str) -> Result<usize> {
        let page = match shift::parse(id, doc) {
            Ok(p) => p,
            Err(e) => {
                self.skip(e)?;
                return Ok(0);
            }
        };
        let examples = page.examples() as u32;
        let shift::ShiftPage { header, fragments, rejected, .. } = page;
        for e in rejected {
            self.skip(e)?;
        }

        let source_id = self.concepts.resolve_concept(&header.source)?;
        let target_id = self.concepts.resolve_concept(&header.target)?;
        if examples != header.realizations {
            logd!("{}: header says {} realizations, found {}", id, header.realizations, examples);
        }

        let ctx = GroupContext {
            shift_id: id,
            source: &header.source,
            source_id,
            target: &header.target,
            target_id,
        };
        let mut made = 0;
        for frag in &fragments {
            match self.builder.build(frag, &ctx, &mut self.languages) {
                Ok(record) => {
                    self.records.push(record);
                    made += 1;
                }
                Err(e) => self.skip(e)?,
            }
        }

        self.groups.push(ShiftGroup {
            id: s!(id),
            source: header.source.clone(),
            source_number: source_id,
            direction: header.direction.clone(),
            target: header.target.clone(),
            target_number: target_id,
            realizations: header.realizations,
            examples,
        });
        Ok(made)
    }

    /// Languages still at zero words get the number of distinct lexemes
    /// that cite them, on either side of a record.
    pub fn backfill_word_counts(&mut self) -> usize {
        let mut words: BTreeMap<u32, BTreeSet<&str>> = BTreeMap::new();
        for r in &self.records {
            words.entry(r.source_language_id).or_default().insert(r.source_word.as_str());
            words.entry(r.target_language_id).or_default().insert(r.target_word.as_str());
        }
        let mut filled = 0;
        for (id, set) in words {
            let Some(lang) = self.languages.language_mut(id) else { continue };
            if lang.word_count == 0 {
                lang.word_count = set.len() as u32;
                filled += 1;
            }
        }
        if filled > 0 {
            logd!("Languages: backfilled word counts for {}", filled);
        }
        filled
    }

    pub fn records(&self) -> &[ShiftRecord] { &self.records }
    pub fn groups(&self) -> &[ShiftGroup] { &self.groups }
    pub fn skips(&self) -> &[SkipReport] { &self.skips }
    pub fn languages(&self) -> &LanguageRegistry { &self.languages }
    pub fn concepts(&self) -> &ConceptRegistry { &self.concepts }

    /// Backfill, aggregate and hand everything over for emission.
    pub fn finish(mut self) -> Result<Output> {
        self.backfill_word_counts();

        let graph = ConceptGraph::build(&self.records, &self.languages)?;
        let violations = graph.check_symmetry();
        let enriched = graph.enrich(&self.concepts)?;
        let pairs = graph.pair_rows(&self.concepts)?;

        Ok(Output {
            languages: self.languages,
            concepts: self.concepts,
            groups: self.groups,
            records: self.records,
            graph,
            violations,
            enriched,
            pairs,
            skips: self.skips,
        })
    }
}

/// Everything a finished run knows.
#[derive(Debug)]
pub struct Output {
    pub languages: LanguageRegistry,
    pub concepts: ConceptRegistry,
    pub groups: Vec<ShiftGroup>,
    pub records: Vec<ShiftRecord>,
    pub graph: ConceptGraph,
    pub violations: Vec<SymmetryViolation>,
    pub enriched: Vec<EnrichedConcept>,
    pub pairs: Vec<PairRow>,
    pub skips: Vec<SkipReport>,
}

impl Output {
    /// Tables in write order; `concepts-mapped` only with a lookup.
    pub fn tables(&self, lookup: Option<&dyn ConceptLookup>) -> Result<Vec<Table>> {
        let mut out = vec![
            tables::languages(&self.languages),
            tables::concepts(&self.concepts),
            tables::shift_groups(&self.groups),
            tables::lexemes(&self.records),
            tables::parameters(&self.enriched)?,
            tables::pairs(&self.pairs),
        ];
        if let Some(l) = lookup {
            out.push(map_concepts(self.concepts.rows(), l));
        }
        Ok(out)
    }
}

/// Summary of what was produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files_written: Vec<PathBuf>,
    pub pages: usize,
    pub records: usize,
    pub skips: Vec<SkipReport>,
    pub violations: usize,
    /// Glottocodes kept but flagged under the `review` policy.
    pub review: Vec<(u32, String)>,
}

/// Top-level runner: read the input layout, build, write every table.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn run(opts: &PipelineOptions, progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
    let mut silent = NullProgress;
    let progress: &mut dyn Progress = match progress {
        Some(p) => p,
        None => &mut silent,
    };
    let overrides = opts.overrides()?;
    let mut pipeline = Pipeline::new();

    let lang_page = opts.languages_page();
    if !lang_page.is_file() {
        return Err(Error::Input(format!("missing language listing {}", lang_page.display())));
    }
    pipeline.load_languages(&read_page(&lang_page)?, &overrides);

    let concept_pages = list_pages(&opts.concepts_dir(), "", PAGE_EXT)?;
    let docs = concept_pages
        .iter()
        .map(|p| read_page(p))
        .collect::<Result<Vec<_>>>()?;
    pipeline.load_concepts(&docs);

    let shift_pages = list_pages(&opts.shifts_dir(), SHIFT_PAGE_PREFIX, PAGE_EXT)?;
    progress.begin(shift_pages.len());
    for (i, path) in shift_pages.iter().enumerate() {
        let id = page_id(path);
        let doc = read_page(path)?;
        pipeline.add_shift_page(&id, &doc)?;
        progress.item_done(i);
    }

    let lookup = opts.mapping_file.as_deref().map(TableLookup::load).transpose()?;
    let output = pipeline.finish()?;

    let mut files_written = Vec::new();
    for table in output.tables(lookup.as_ref().map(|l| l as &dyn ConceptLookup))? {
        files_written.push(write_table(&opts.output_dir, &table, opts.format)?);
    }

    progress.log(&format!(
        "Wrote {} tables to {}",
        files_written.len(),
        opts.output_dir.display()
    ));
    progress.finish();

    Ok(RunSummary {
        files_written,
        pages: shift_pages.len(),
        records: output.records.len(),
        violations: output.violations.len(),
        review: output.languages.review().to_vec(),
        skips: output.skips,
    })
}
